//! File repository

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{File, FileInfo, NewFile},
};

const INFO_COLUMNS: &str =
    "id, filename, content_type, size, user_id, hackathon_id, project_id, created_at";

/// Repository for uploaded file database operations
pub struct FileRepository;

impl FileRepository {
    /// Store a new file
    pub async fn create(pool: &PgPool, file: &NewFile) -> AppResult<FileInfo> {
        let sql = format!(
            r#"
            INSERT INTO files (id, filename, data, content_type, size, user_id, hackathon_id, project_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {INFO_COLUMNS}
            "#
        );
        let info = sqlx::query_as::<_, FileInfo>(&sql)
            .bind(&file.id)
            .bind(&file.filename)
            .bind(&file.data)
            .bind(&file.content_type)
            .bind(file.data.len() as i64)
            .bind(file.user_id)
            .bind(&file.hackathon_id)
            .bind(file.project_id)
            .fetch_one(pool)
            .await?;

        Ok(info)
    }

    /// Find a file including its content
    pub async fn find_by_id(pool: &PgPool, id: &str) -> AppResult<Option<File>> {
        let file = sqlx::query_as::<_, File>(r#"SELECT * FROM files WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(file)
    }

    /// Metadata of every file, newest first
    pub async fn list(pool: &PgPool) -> AppResult<Vec<FileInfo>> {
        let sql = format!("SELECT {INFO_COLUMNS} FROM files ORDER BY created_at DESC");
        let files = sqlx::query_as::<_, FileInfo>(&sql).fetch_all(pool).await?;

        Ok(files)
    }

    /// Metadata of the files attached to a project
    pub async fn find_by_project(pool: &PgPool, project_id: i64) -> AppResult<Vec<FileInfo>> {
        let sql = format!(
            "SELECT {INFO_COLUMNS} FROM files WHERE project_id = $1 ORDER BY created_at DESC"
        );
        let files = sqlx::query_as::<_, FileInfo>(&sql)
            .bind(project_id)
            .fetch_all(pool)
            .await?;

        Ok(files)
    }

    /// Delete a file
    pub async fn delete(pool: &PgPool, id: &str) -> AppResult<()> {
        sqlx::query(r#"DELETE FROM files WHERE id = $1"#)
            .bind(id)
            .execute(pool)
            .await?;

        Ok(())
    }
}
