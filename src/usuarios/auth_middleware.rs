// src/usuarios/auth_middleware.rs

use actix_web::{
    dev::Payload,
    error::{ErrorForbidden, ErrorUnauthorized},
    web, FromRequest, HttpRequest,
};

use futures::future::{ready, Ready};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

// Importa as Claims do módulo de structs de usuário
use super::usuario_structs::Claims;
// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Struct que representa o usuário autenticado, contendo as claims do JWT.
/// Será extraída das requisições protegidas: basta estar autenticado.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub user_name: String,
    pub user_email: String,
    pub perfil: String,
}

/// Extrator para rotas que exigem o perfil "admin" (criação, atualização
/// e exclusão). Reutiliza a validação de AuthenticatedUser e devolve 403
/// quando o token é válido mas o perfil não é de administrador.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

fn validar_token(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    // Acessa o AppState para obter a chave secreta JWT
    let app_state = req.app_data::<web::Data<AppState>>();

    let jwt_secret = match app_state {
        Some(state) => state.jwt_secret.clone(),
        None => {
            eprintln!("Erro: AppState ou jwt_secret não disponível no extrator.");
            return Err(ErrorUnauthorized("Erro de configuração do servidor."));
        }
    };

    // Tenta obter o cabeçalho "Authorization"
    let auth_header = req.headers().get("Authorization");

    let token = match auth_header {
        Some(header_value) => {
            let header_str = match header_value.to_str() {
                Ok(s) => s,
                Err(_) => return Err(ErrorUnauthorized("Token de autenticação inválido.")),
            };

            // Verifica se o cabeçalho começa com "Bearer "
            if header_str.starts_with("Bearer ") {
                header_str.trim_start_matches("Bearer ").to_string()
            } else {
                return Err(ErrorUnauthorized(
                    "Formato de token inválido. Esperado 'Bearer <token>'.",
                ));
            }
        }
        None => {
            return Err(ErrorUnauthorized("Token de autenticação ausente."));
        }
    };

    // Configuração de validação do JWT
    let validation = Validation::new(Algorithm::HS256);

    // Decodifica e valida o token
    let token_data = match decode::<Claims>(
        &token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &validation,
    ) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Erro ao decodificar/validar JWT: {:?}", e);
            let error_message = match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token expirado.",
                jsonwebtoken::errors::ErrorKind::InvalidSignature => "Assinatura do token inválida.",
                jsonwebtoken::errors::ErrorKind::InvalidToken => "Token malformado.",
                _ => "Token de autenticação inválido.",
            };
            return Err(ErrorUnauthorized(error_message));
        }
    };

    // Se a validação for bem-sucedida, cria a instância de AuthenticatedUser
    Ok(AuthenticatedUser {
        user_id: token_data.claims.sub,
        user_name: token_data.claims.name,
        user_email: token_data.claims.email,
        perfil: token_data.claims.perfil,
    })
}

/// Extrator de autenticação para Actix Web.
/// Este extrator tenta validar um token JWT presente no cabeçalho Authorization.
impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(validar_token(req))
    }
}

impl FromRequest for AdminUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resultado = validar_token(req).and_then(|usuario| {
            if usuario.perfil == "admin" {
                Ok(AdminUser(usuario))
            } else {
                Err(ErrorForbidden(
                    "Acesso negado: operação restrita a administradores.",
                ))
            }
        });
        ready(resultado)
    }
}
