// src/categorias/categoria_router.rs

use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};

// Importa as structs de categoria
use super::categoria_structs::{NovaCategoria, PaginacaoQuery};

use crate::shared::shared_structs::{GenericResponse, Meta};

// Importa os extratores de autenticação
use crate::usuarios::auth_middleware::{AdminUser, AuthenticatedUser};

// Importa o AppState do módulo raiz (main.rs)
use crate::AppState;

/// Rota para listar categorias com paginação.
///
/// `page` começa em 1 e é convertido para o índice interno iniciado em 0;
/// `size` define o tamanho da página. Uma página fora do intervalo devolve
/// uma coleção vazia com status 200.
#[get("/categorias")]
pub async fn listar_categorias(
    data: web::Data<AppState>,
    query: web::Query<PaginacaoQuery>,
    req: HttpRequest,
    _usuario: AuthenticatedUser,
) -> HttpResponse {
    let pagina = query.page.unwrap_or(1).max(1) - 1;
    let tamanho = query.size.unwrap_or(10).max(1);

    match data.categorias.listar(pagina, tamanho).await {
        Ok(resultado) => {
            let meta = Meta::new(
                &req,
                resultado.total_paginas(),
                resultado.total_elementos,
                resultado.pagina + 1,
                resultado.tamanho,
            );
            HttpResponse::Ok().json(GenericResponse {
                status: "success".to_string(),
                message: "Lista de categorias devolvida com sucesso.".to_string(),
                body: Some(resultado.itens),
                meta: Some(meta),
            })
        }
        Err(e) => {
            eprintln!("Erro ao listar categorias: {:?}", e);
            HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao listar categorias".to_string(),
                body: None,
                meta: None,
            })
        }
    }
}

/// Rota para buscar uma categoria por ID.
#[get("/categorias/{id}")]
pub async fn buscar_categoria_por_id(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    _usuario: AuthenticatedUser,
) -> HttpResponse {
    let id = path.into_inner();

    match data.categorias.buscar_por_id(id).await {
        Ok(Some(categoria)) => HttpResponse::Ok().json(GenericResponse {
            status: "success".to_string(),
            message: "Categoria devolvida com sucesso.".to_string(),
            body: Some(categoria),
            meta: None,
        }),
        Ok(None) => HttpResponse::NotFound().json(GenericResponse::<()> {
            status: "error".to_string(),
            message: format!("Categoria com ID {} não encontrada.", id),
            body: None,
            meta: None,
        }),
        Err(e) => {
            eprintln!("Erro ao buscar categoria por ID {}: {:?}", id, e);
            HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao buscar categoria".to_string(),
                body: None,
                meta: None,
            })
        }
    }
}

/// Rota para cadastrar uma nova categoria. Restrita a administradores.
/// O nome da categoria é único: um nome repetido devolve 409.
#[post("/categorias")]
pub async fn cadastrar_categoria(
    data: web::Data<AppState>,
    item: web::Json<NovaCategoria>,
    _admin: AdminUser,
) -> HttpResponse {
    match data.categorias.buscar_por_nome(&item.nome).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: format!("Já existe uma categoria com o nome: {}", item.nome),
                body: None,
                meta: None,
            });
        }
        Err(e) => {
            eprintln!("Erro ao verificar nome de categoria existente: {:?}", e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao cadastrar categoria".to_string(),
                body: None,
                meta: None,
            });
        }
        _ => {} // Nome livre, pode prosseguir
    }

    match data.categorias.criar(&item).await {
        Ok(categoria) => HttpResponse::Created().json(GenericResponse {
            status: "success".to_string(),
            message: "Categoria registrada com sucesso.".to_string(),
            body: Some(categoria),
            meta: None,
        }),
        Err(e) => {
            eprintln!("Erro ao inserir categoria: {:?}", e);
            HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao cadastrar categoria".to_string(),
                body: None,
                meta: None,
            })
        }
    }
}

/// Rota para atualizar uma categoria existente. Restrita a administradores.
/// Apenas nome e descrição são sobrescritos; o ID permanece o mesmo.
#[put("/categorias/{id}")]
pub async fn atualizar_categoria(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    item: web::Json<NovaCategoria>,
    _admin: AdminUser,
) -> HttpResponse {
    let id = path.into_inner();

    let mut categoria = match data.categorias.buscar_por_id(id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: format!("Categoria com ID {} não encontrada.", id),
                body: None,
                meta: None,
            });
        }
        Err(e) => {
            eprintln!("Erro ao buscar categoria com ID {}: {:?}", id, e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao atualizar categoria".to_string(),
                body: None,
                meta: None,
            });
        }
    };

    categoria.nome = item.nome.clone();
    categoria.descricao = item.descricao.clone();

    match data.categorias.atualizar(&categoria).await {
        Ok(()) => HttpResponse::Ok().json(GenericResponse {
            status: "success".to_string(),
            message: "Categoria atualizada com sucesso.".to_string(),
            body: Some(categoria),
            meta: None,
        }),
        Err(e) => {
            eprintln!("Erro ao atualizar categoria com ID {}: {:?}", id, e);
            HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao atualizar categoria".to_string(),
                body: None,
                meta: None,
            })
        }
    }
}

/// Rota para excluir uma categoria. Restrita a administradores.
///
/// A exclusão é bloqueada com 400 enquanto houver produtos associados.
/// Em caso de sucesso, o corpo devolve o estado da categoria antes da
/// exclusão.
#[delete("/categorias/{id}")]
pub async fn deletar_categoria(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    _admin: AdminUser,
) -> HttpResponse {
    let id = path.into_inner();

    let categoria = match data.categorias.buscar_por_id(id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return HttpResponse::NotFound().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: format!("Categoria com ID {} não encontrada.", id),
                body: None,
                meta: None,
            });
        }
        Err(e) => {
            eprintln!("Erro ao buscar categoria com ID {}: {:?}", id, e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao excluir categoria".to_string(),
                body: None,
                meta: None,
            });
        }
    };

    match data.categorias.contar_produtos(id).await {
        Ok(0) => {}
        Ok(_) => {
            return HttpResponse::BadRequest().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Não é possível excluir a categoria porque há produtos associados."
                    .to_string(),
                body: None,
                meta: None,
            });
        }
        Err(e) => {
            eprintln!("Erro ao contar produtos da categoria {}: {:?}", id, e);
            return HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao excluir categoria".to_string(),
                body: None,
                meta: None,
            });
        }
    }

    match data.categorias.deletar_por_id(id).await {
        Ok(()) => HttpResponse::Ok().json(GenericResponse {
            status: "success".to_string(),
            message: "Categoria excluída com sucesso.".to_string(),
            body: Some(categoria),
            meta: None,
        }),
        Err(e) => {
            eprintln!("Erro ao excluir categoria com ID {}: {:?}", id, e);
            HttpResponse::InternalServerError().json(GenericResponse::<()> {
                status: "error".to_string(),
                message: "Erro ao excluir categoria".to_string(),
                body: None,
                meta: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categorias::categoria_repository::{CategoriaRepository, MemoriaCategoriaRepository};
    use crate::usuarios::usuario_repository::MemoriaUsuarioRepository;
    use crate::usuarios::usuario_router::gerar_token;
    use crate::usuarios::usuario_structs::Usuario;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use std::sync::Arc;

    const SEGREDO_TESTE: &str = "segredo_de_teste_123";

    fn estado(repo: Arc<MemoriaCategoriaRepository>) -> web::Data<AppState> {
        web::Data::new(AppState {
            categorias: repo,
            usuarios: Arc::new(MemoriaUsuarioRepository::new()),
            jwt_secret: SEGREDO_TESTE.to_string(),
        })
    }

    fn token(perfil: &str) -> String {
        let usuario = Usuario {
            id: 1,
            nome: "Usuária de Teste".to_string(),
            email: "teste@loja.com".to_string(),
            senha_hash: String::new(),
            perfil: perfil.to_string(),
        };
        gerar_token(&usuario, SEGREDO_TESTE).unwrap()
    }

    fn bearer(perfil: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token(perfil)))
    }

    macro_rules! app_teste {
        ($estado:expr) => {
            test::init_service(
                App::new()
                    .app_data($estado.clone())
                    .service(listar_categorias)
                    .service(buscar_categoria_por_id)
                    .service(cadastrar_categoria)
                    .service(atualizar_categoria)
                    .service(deletar_categoria),
            )
            .await
        };
    }

    async fn semear(repo: &MemoriaCategoriaRepository, nome: &str, descricao: &str) -> i64 {
        let categoria = repo
            .criar(&NovaCategoria {
                nome: nome.to_string(),
                descricao: descricao.to_string(),
            })
            .await
            .unwrap();
        categoria.id
    }

    #[actix_web::test]
    async fn listagem_vazia_devolve_colecao_vazia_e_total_zero() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::get()
            .uri("/categorias?page=1&size=10")
            .insert_header(bearer("cliente"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let corpo: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(corpo["body"], serde_json::json!([]));
        assert_eq!(corpo["meta"]["total_elementos"], 0);
        assert_eq!(corpo["meta"]["numero_pagina"], 1);
        assert_eq!(corpo["meta"]["tamanho_pagina"], 10);
    }

    #[actix_web::test]
    async fn listagem_paginada_devolve_totais_corretos() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        semear(&repo, "Roupas", "Vestuário em geral").await;
        semear(&repo, "Calçados", "Sapatos e tênis").await;
        semear(&repo, "Acessórios", "Bolsas e cintos").await;
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::get()
            .uri("/categorias?page=2&size=2")
            .insert_header(bearer("cliente"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let corpo: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(corpo["body"].as_array().unwrap().len(), 1);
        assert_eq!(corpo["meta"]["total_elementos"], 3);
        assert_eq!(corpo["meta"]["total_paginas"], 2);
        assert_eq!(corpo["meta"]["numero_pagina"], 2);
    }

    #[actix_web::test]
    async fn listagem_fora_do_intervalo_devolve_pagina_vazia() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        semear(&repo, "Roupas", "Vestuário em geral").await;
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::get()
            .uri("/categorias?page=5&size=10")
            .insert_header(bearer("cliente"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let corpo: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(corpo["body"], serde_json::json!([]));
        assert_eq!(corpo["meta"]["total_elementos"], 1);
    }

    #[actix_web::test]
    async fn cadastro_com_nome_repetido_devolve_conflito() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let app = app_teste!(estado(repo.clone()));

        let req = test::TestRequest::post()
            .uri("/categorias")
            .insert_header(bearer("admin"))
            .set_json(serde_json::json!({ "nome": "Eletrônicos", "descricao": "Aparelhos" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/categorias")
            .insert_header(bearer("admin"))
            .set_json(serde_json::json!({ "nome": "Eletrônicos", "descricao": "Outra descrição" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        // A primeira categoria permanece intacta
        let existente = repo.buscar_por_nome("Eletrônicos").await.unwrap().unwrap();
        assert_eq!(existente.descricao, "Aparelhos");
    }

    #[actix_web::test]
    async fn excluir_sem_produtos_remove_a_categoria() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let id = semear(&repo, "Promoções", "Itens em oferta").await;
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::delete()
            .uri(&format!("/categorias/{}", id))
            .insert_header(bearer("admin"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let corpo: serde_json::Value = test::read_body_json(resp).await;
        // O corpo devolve o estado anterior à exclusão
        assert_eq!(corpo["body"]["nome"], "Promoções");

        let req = test::TestRequest::get()
            .uri(&format!("/categorias/{}", id))
            .insert_header(bearer("cliente"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn excluir_com_produtos_associados_devolve_bad_request() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let id = semear(&repo, "Perfumaria", "Fragrâncias").await;
        repo.associar_produtos(id, 2);
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::delete()
            .uri(&format!("/categorias/{}", id))
            .insert_header(bearer("admin"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // A categoria continua recuperável
        let req = test::TestRequest::get()
            .uri(&format!("/categorias/{}", id))
            .insert_header(bearer("cliente"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn atualizar_id_inexistente_devolve_not_found_sem_criar() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let app = app_teste!(estado(repo.clone()));

        let req = test::TestRequest::put()
            .uri("/categorias/99")
            .insert_header(bearer("admin"))
            .set_json(serde_json::json!({ "nome": "Fantasma", "descricao": "Não existe" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(repo.buscar_por_nome("Fantasma").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn atualizar_sobrescreve_apenas_nome_e_descricao() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let id = semear(&repo, "Livros", "Literatura").await;
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::put()
            .uri(&format!("/categorias/{}", id))
            .insert_header(bearer("admin"))
            .set_json(serde_json::json!({ "nome": "Papelaria", "descricao": "Material de escritório" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let corpo: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(corpo["body"]["id"], id);
        assert_eq!(corpo["body"]["nome"], "Papelaria");
        assert_eq!(corpo["body"]["descricao"], "Material de escritório");
    }

    #[actix_web::test]
    async fn buscar_id_inexistente_devolve_mensagem_com_o_id() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::get()
            .uri("/categorias/42")
            .insert_header(bearer("cliente"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let corpo: serde_json::Value = test::read_body_json(resp).await;
        assert!(corpo["message"].as_str().unwrap().contains("42"));
    }

    #[actix_web::test]
    async fn requisicao_sem_token_devolve_unauthorized() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let app = app_teste!(estado(repo));

        let req = test::TestRequest::get().uri("/categorias").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn mutacao_com_perfil_cliente_devolve_forbidden() {
        let repo = Arc::new(MemoriaCategoriaRepository::new());
        let app = app_teste!(estado(repo.clone()));

        let req = test::TestRequest::post()
            .uri("/categorias")
            .insert_header(bearer("cliente"))
            .set_json(serde_json::json!({ "nome": "Brinquedos", "descricao": "Infantil" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(repo.buscar_por_nome("Brinquedos").await.unwrap().is_none());
    }
}
