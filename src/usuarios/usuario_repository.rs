// src/usuarios/usuario_repository.rs

use async_trait::async_trait;
use sqlx::{query_as, Pool, Postgres};

use super::usuario_structs::Usuario;

/// Capacidade de armazenamento de usuários, na mesma linha do repositório
/// de categorias: as rotas de cadastro e login dependem desta trait.
#[async_trait]
pub trait UsuarioRepository: Send + Sync {
    async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>, sqlx::Error>;

    /// Insere um novo usuário (senha já em hash) e devolve a entidade com o id gerado.
    async fn salvar(
        &self,
        nome: &str,
        email: &str,
        senha_hash: &str,
        perfil: &str,
    ) -> Result<Usuario, sqlx::Error>;
}

/// Implementação do repositório de usuários sobre o PostgreSQL.
pub struct PostgresUsuarioRepository {
    pool: Pool<Postgres>,
}

impl PostgresUsuarioRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresUsuarioRepository { pool }
    }
}

#[async_trait]
impl UsuarioRepository for PostgresUsuarioRepository {
    async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>, sqlx::Error> {
        query_as::<_, Usuario>(
            "SELECT id, nome, email, senha_hash, perfil FROM usuarios WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn salvar(
        &self,
        nome: &str,
        email: &str,
        senha_hash: &str,
        perfil: &str,
    ) -> Result<Usuario, sqlx::Error> {
        query_as::<_, Usuario>(
            "INSERT INTO usuarios (nome, email, senha_hash, perfil) VALUES ($1, $2, $3, $4) \
             RETURNING id, nome, email, senha_hash, perfil",
        )
        .bind(nome)
        .bind(email)
        .bind(senha_hash)
        .bind(perfil)
        .fetch_one(&self.pool)
        .await
    }
}

/// Repositório de usuários em memória usado nos testes.
#[cfg(test)]
pub struct MemoriaUsuarioRepository {
    dados: std::sync::RwLock<Vec<Usuario>>,
}

#[cfg(test)]
impl MemoriaUsuarioRepository {
    pub fn new() -> Self {
        MemoriaUsuarioRepository {
            dados: std::sync::RwLock::new(Vec::new()),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl UsuarioRepository for MemoriaUsuarioRepository {
    async fn buscar_por_email(&self, email: &str) -> Result<Option<Usuario>, sqlx::Error> {
        let dados = self.dados.read().unwrap();
        Ok(dados.iter().find(|u| u.email == email).cloned())
    }

    async fn salvar(
        &self,
        nome: &str,
        email: &str,
        senha_hash: &str,
        perfil: &str,
    ) -> Result<Usuario, sqlx::Error> {
        let mut dados = self.dados.write().unwrap();
        let usuario = Usuario {
            id: dados.len() as i64 + 1,
            nome: nome.to_string(),
            email: email.to_string(),
            senha_hash: senha_hash.to_string(),
            perfil: perfil.to_string(),
        };
        dados.push(usuario.clone());
        Ok(usuario)
    }
}
