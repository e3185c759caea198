// src/categorias/categoria_structs.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estrutura para receber dados de uma categoria na requisição POST/PUT
#[derive(Deserialize)]
pub struct NovaCategoria {
    pub nome: String,
    pub descricao: String,
}

/// Estrutura que representa uma categoria no banco de dados.
/// O `id` é gerado pelo banco e nunca muda depois de criado.
#[derive(Serialize, FromRow, Clone)]
pub struct Categoria {
    pub id: i64,
    pub nome: String,
    pub descricao: String,
}

/// Parâmetros de paginação da listagem. `page` começa em 1.
#[derive(Deserialize)]
pub struct PaginacaoQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

/// Uma página de resultados devolvida pelo repositório.
/// `pagina` é o índice interno iniciado em 0.
pub struct Pagina<T> {
    pub itens: Vec<T>,
    pub total_elementos: i64,
    pub pagina: i64,
    pub tamanho: i64,
}

impl<T> Pagina<T> {
    /// Total de páginas para o tamanho usado na consulta.
    pub fn total_paginas(&self) -> i64 {
        if self.tamanho <= 0 {
            return 0;
        }
        (self.total_elementos + self.tamanho - 1) / self.tamanho
    }
}
