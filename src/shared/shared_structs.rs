// src/shared/shared_structs.rs

use actix_web::HttpRequest;
use serde::Serialize;

/// Estrutura genérica para padronizar as respostas da API.
/// 'T' é o tipo do corpo da resposta, que pode ser opcional.
#[derive(Serialize)]
pub struct GenericResponse<T> {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")] // Não serializa 'body' se for None
    pub body: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")] // Metadados só aparecem em listagens
    pub meta: Option<Meta>,
}

/// Metadados de paginação anexados às respostas de listagem:
/// método e URL da requisição mais os totais da consulta.
#[derive(Serialize)]
pub struct Meta {
    pub metodo: String,
    pub url: String,
    pub total_paginas: i64,
    pub total_elementos: i64,
    pub numero_pagina: i64,
    pub tamanho_pagina: i64,
}

impl Meta {
    /// Monta os metadados a partir da requisição e dos totais da consulta.
    /// `numero_pagina` já deve vir ajustado para a contagem iniciada em 1.
    pub fn new(
        req: &HttpRequest,
        total_paginas: i64,
        total_elementos: i64,
        numero_pagina: i64,
        tamanho_pagina: i64,
    ) -> Self {
        Meta {
            metodo: req.method().to_string(),
            url: req.uri().to_string(),
            total_paginas,
            total_elementos,
            numero_pagina,
            tamanho_pagina,
        }
    }
}
