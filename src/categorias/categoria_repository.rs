// src/categorias/categoria_repository.rs

use async_trait::async_trait;
use sqlx::{query, query_as, Pool, Postgres, Row};

use super::categoria_structs::{Categoria, NovaCategoria, Pagina};

/// Capacidade de armazenamento de categorias.
///
/// As rotas recebem esta trait por referência (via AppState) em vez de
/// falarem direto com o banco, o que permite trocar a implementação nos
/// testes. Buscas devolvem `Option`: `Some` quando a categoria existe,
/// `None` quando não existe.
#[async_trait]
pub trait CategoriaRepository: Send + Sync {
    /// Devolve uma página de categorias. `pagina` é o índice iniciado em 0.
    async fn listar(&self, pagina: i64, tamanho: i64) -> Result<Pagina<Categoria>, sqlx::Error>;

    async fn buscar_por_id(&self, id: i64) -> Result<Option<Categoria>, sqlx::Error>;

    async fn buscar_por_nome(&self, nome: &str) -> Result<Option<Categoria>, sqlx::Error>;

    /// Insere uma nova categoria e devolve a entidade com o id gerado.
    async fn criar(&self, nova: &NovaCategoria) -> Result<Categoria, sqlx::Error>;

    /// Sobrescreve nome e descrição de uma categoria existente.
    async fn atualizar(&self, categoria: &Categoria) -> Result<(), sqlx::Error>;

    /// Quantos produtos referenciam a categoria.
    async fn contar_produtos(&self, id: i64) -> Result<i64, sqlx::Error>;

    async fn deletar_por_id(&self, id: i64) -> Result<(), sqlx::Error>;
}

/// Implementação do repositório sobre o PostgreSQL.
pub struct PostgresCategoriaRepository {
    pool: Pool<Postgres>,
}

impl PostgresCategoriaRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresCategoriaRepository { pool }
    }
}

#[async_trait]
impl CategoriaRepository for PostgresCategoriaRepository {
    async fn listar(&self, pagina: i64, tamanho: i64) -> Result<Pagina<Categoria>, sqlx::Error> {
        let itens = query_as::<_, Categoria>(
            "SELECT id, nome, descricao FROM categorias ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(tamanho)
        .bind(pagina * tamanho)
        .fetch_all(&self.pool)
        .await?;

        let row = query("SELECT COUNT(*) AS total FROM categorias")
            .fetch_one(&self.pool)
            .await?;
        let total_elementos = row.try_get::<i64, &str>("total")?;

        Ok(Pagina {
            itens,
            total_elementos,
            pagina,
            tamanho,
        })
    }

    async fn buscar_por_id(&self, id: i64) -> Result<Option<Categoria>, sqlx::Error> {
        query_as::<_, Categoria>("SELECT id, nome, descricao FROM categorias WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn buscar_por_nome(&self, nome: &str) -> Result<Option<Categoria>, sqlx::Error> {
        query_as::<_, Categoria>("SELECT id, nome, descricao FROM categorias WHERE nome = $1")
            .bind(nome)
            .fetch_optional(&self.pool)
            .await
    }

    async fn criar(&self, nova: &NovaCategoria) -> Result<Categoria, sqlx::Error> {
        query_as::<_, Categoria>(
            "INSERT INTO categorias (nome, descricao) VALUES ($1, $2) RETURNING id, nome, descricao",
        )
        .bind(&nova.nome)
        .bind(&nova.descricao)
        .fetch_one(&self.pool)
        .await
    }

    async fn atualizar(&self, categoria: &Categoria) -> Result<(), sqlx::Error> {
        query("UPDATE categorias SET nome = $1, descricao = $2 WHERE id = $3")
            .bind(&categoria.nome)
            .bind(&categoria.descricao)
            .bind(categoria.id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn contar_produtos(&self, id: i64) -> Result<i64, sqlx::Error> {
        let row = query("SELECT COUNT(*) AS total FROM produtos WHERE categoria_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        row.try_get::<i64, &str>("total")
    }

    async fn deletar_por_id(&self, id: i64) -> Result<(), sqlx::Error> {
        query("DELETE FROM categorias WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Repositório em memória usado nos testes das rotas.
#[cfg(test)]
pub struct MemoriaCategoriaRepository {
    dados: std::sync::RwLock<EstadoMemoria>,
}

#[cfg(test)]
struct EstadoMemoria {
    categorias: Vec<Categoria>,
    produtos_por_categoria: std::collections::HashMap<i64, i64>,
    proximo_id: i64,
}

#[cfg(test)]
impl MemoriaCategoriaRepository {
    pub fn new() -> Self {
        MemoriaCategoriaRepository {
            dados: std::sync::RwLock::new(EstadoMemoria {
                categorias: Vec::new(),
                produtos_por_categoria: std::collections::HashMap::new(),
                proximo_id: 1,
            }),
        }
    }

    /// Associa `quantidade` produtos à categoria, para exercitar a trava de exclusão.
    pub fn associar_produtos(&self, categoria_id: i64, quantidade: i64) {
        let mut dados = self.dados.write().unwrap();
        dados.produtos_por_categoria.insert(categoria_id, quantidade);
    }
}

#[cfg(test)]
#[async_trait]
impl CategoriaRepository for MemoriaCategoriaRepository {
    async fn listar(&self, pagina: i64, tamanho: i64) -> Result<Pagina<Categoria>, sqlx::Error> {
        let dados = self.dados.read().unwrap();
        let inicio = (pagina * tamanho) as usize;
        let itens = dados
            .categorias
            .iter()
            .skip(inicio)
            .take(tamanho as usize)
            .cloned()
            .collect();
        Ok(Pagina {
            itens,
            total_elementos: dados.categorias.len() as i64,
            pagina,
            tamanho,
        })
    }

    async fn buscar_por_id(&self, id: i64) -> Result<Option<Categoria>, sqlx::Error> {
        let dados = self.dados.read().unwrap();
        Ok(dados.categorias.iter().find(|c| c.id == id).cloned())
    }

    async fn buscar_por_nome(&self, nome: &str) -> Result<Option<Categoria>, sqlx::Error> {
        let dados = self.dados.read().unwrap();
        Ok(dados.categorias.iter().find(|c| c.nome == nome).cloned())
    }

    async fn criar(&self, nova: &NovaCategoria) -> Result<Categoria, sqlx::Error> {
        let mut dados = self.dados.write().unwrap();
        let categoria = Categoria {
            id: dados.proximo_id,
            nome: nova.nome.clone(),
            descricao: nova.descricao.clone(),
        };
        dados.proximo_id += 1;
        dados.categorias.push(categoria.clone());
        Ok(categoria)
    }

    async fn atualizar(&self, categoria: &Categoria) -> Result<(), sqlx::Error> {
        let mut dados = self.dados.write().unwrap();
        if let Some(existente) = dados.categorias.iter_mut().find(|c| c.id == categoria.id) {
            existente.nome = categoria.nome.clone();
            existente.descricao = categoria.descricao.clone();
        }
        Ok(())
    }

    async fn contar_produtos(&self, id: i64) -> Result<i64, sqlx::Error> {
        let dados = self.dados.read().unwrap();
        Ok(*dados.produtos_por_categoria.get(&id).unwrap_or(&0))
    }

    async fn deletar_por_id(&self, id: i64) -> Result<(), sqlx::Error> {
        let mut dados = self.dados.write().unwrap();
        dados.categorias.retain(|c| c.id != id);
        Ok(())
    }
}
