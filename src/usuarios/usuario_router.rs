// src/usuarios/usuario_router.rs

use actix_web::{post, web, HttpResponse};
use bcrypt::{hash, verify, DEFAULT_COST}; // Para hashing de senhas
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json;

// Importa as structs do módulo de usuários
use super::usuario_structs::{AuthResponse, Claims, LoginRequest, NovoUsuario, Usuario};
// Importa GenericResponse do módulo shared_structs
use crate::shared::shared_structs::GenericResponse;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Gera um JWT HS256 com validade de 24 horas para o usuário.
pub fn gerar_token(usuario: &Usuario, jwt_secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: usuario.id,
        name: usuario.nome.clone(),
        email: usuario.email.clone(),
        perfil: usuario.perfil.clone(),
        exp: (Utc::now() + Duration::hours(24)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
}

/// Rota para cadastrar um novo usuário.
#[post("/usuarios/cadastro")]
pub async fn cadastrar_usuario(
    data: web::Data<AppState>,
    novo_usuario: web::Json<NovoUsuario>,
) -> HttpResponse {
    // 1. Verificar se o e-mail já está em uso
    match data.usuarios.buscar_por_email(&novo_usuario.email).await {
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "E-mail já cadastrado.".to_string(),
                body: None,
                meta: None,
            });
        }
        Err(e) => {
            eprintln!("Erro ao verificar e-mail existente: {:?}", e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro interno ao verificar e-mail.".to_string(),
                body: None,
                meta: None,
            });
        }
        _ => {} // E-mail não encontrado, pode prosseguir
    }

    // 2. Hash da senha
    let hashed_password = match hash(&novo_usuario.senha, DEFAULT_COST) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("Erro ao fazer hash da senha: {:?}", e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro interno ao processar senha.".to_string(),
                body: None,
                meta: None,
            });
        }
    };

    // 3. Inserir o novo usuário no banco de dados
    let result = data
        .usuarios
        .salvar(
            &novo_usuario.nome,
            &novo_usuario.email,
            &hashed_password,
            &novo_usuario.perfil,
        )
        .await;

    match result {
        Ok(usuario) => HttpResponse::Ok().json(GenericResponse {
            status: "success".to_string(),
            message: format!("Usuário cadastrado com sucesso! ID: {}", usuario.id),
            body: Some(serde_json::json!({ "id": usuario.id })),
            meta: None,
        }),
        Err(e) => {
            eprintln!("Erro ao inserir usuário: {:?}", e);
            HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao inserir usuário".to_string(),
                body: None,
                meta: None,
            })
        }
    }
}

/// Rota para login de usuário.
#[post("/usuarios/login")]
pub async fn login_usuario(
    data: web::Data<AppState>,
    login_request: web::Json<LoginRequest>,
) -> HttpResponse {
    // 1. Buscar o usuário pelo e-mail
    let user = match data.usuarios.buscar_por_email(&login_request.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return HttpResponse::Unauthorized().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Credenciais inválidas.".to_string(),
                body: None,
                meta: None,
            });
        }
        Err(e) => {
            eprintln!("Erro ao buscar usuário para login: {:?}", e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro interno ao processar login.".to_string(),
                body: None,
                meta: None,
            });
        }
    };

    // 2. Verificar a senha
    let password_matches = match verify(&login_request.senha, &user.senha_hash) {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("Erro ao verificar senha: {:?}", e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro interno ao verificar senha.".to_string(),
                body: None,
                meta: None,
            });
        }
    };

    if !password_matches {
        return HttpResponse::Unauthorized().json(GenericResponse::<()> {
            status: "error".to_string(),
            message: "Credenciais inválidas.".to_string(),
            body: None,
            meta: None,
        });
    }

    // 3. Gerar o token JWT com o perfil do usuário
    let auth_token = match gerar_token(&user, &data.jwt_secret) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Erro ao gerar JWT: {:?}", e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro interno ao gerar token.".to_string(),
                body: None,
                meta: None,
            });
        }
    };

    // 4. Retornar resposta de sucesso
    HttpResponse::Ok().json(AuthResponse {
        status: "success".to_string(),
        message: "Login bem-sucedido!".to_string(),
        user_id: user.id,
        user_name: user.nome,
        user_email: user.email,
        token: auth_token,
    })
}
