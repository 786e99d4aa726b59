//! File service
//!
//! Uploads are kept in the database together with their content. Each file
//! belongs to its uploader and optionally to a hackathon or project.

use serde::Serialize;

use crate::{
    constants::{audit_actions, resource_types, FILE_ID_BYTES},
    db::Repository,
    error::{AppError, AppResult},
    models::{ClientInfo, File, FileInfo, Hackathon, NewFile, Project, User},
    services::{
        audit_service::{AuditEntry, AuditService},
        ConfigurationService,
    },
    utils::{generate_hex_id, UploadedFile},
    validation::{self, fields, FieldErrors},
};

pub const MSG_NO_FILE: &str = "No file uploaded";
pub const MSG_UPLOADS_DISABLED: &str = "File uploads are currently disabled";
pub const MSG_UNKNOWN_HACKATHON: &str = "Hackathon not found";
pub const MSG_UNKNOWN_PROJECT: &str = "Project not found";
pub const MSG_INVALID_PROJECT_ID: &str = "Project ID is not a valid number";
pub const MSG_PROJECT_OUTSIDE_HACKATHON: &str = "Project does not belong to the selected hackathon";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A submitted upload; the attachment ids are raw form values
#[derive(Debug, Clone, Default)]
pub struct FileUpload {
    pub file: Option<UploadedFile>,
    pub hackathon_id: Option<String>,
    pub project_id: Option<String>,
}

/// Choices offered on the upload form
#[derive(Debug, Serialize)]
pub struct UploadOptions {
    pub hackathons: Vec<Hackathon>,
    pub projects: Vec<Project>,
}

/// File service
pub struct FileService;

impl FileService {
    pub async fn list(repo: &dyn Repository) -> AppResult<Vec<FileInfo>> {
        repo.list_files().await
    }

    pub async fn upload_options(repo: &dyn Repository) -> AppResult<UploadOptions> {
        Ok(UploadOptions {
            hackathons: repo.visible_hackathons().await?,
            projects: repo.all_projects().await?,
        })
    }

    pub async fn get(repo: &dyn Repository, id: &str) -> AppResult<File> {
        repo.find_file(id)
            .await?
            .ok_or_else(|| AppError::not_found("File"))
    }

    pub async fn upload(
        repo: &dyn Repository,
        upload: FileUpload,
        uploader: &User,
        max_size: usize,
        client: &ClientInfo,
    ) -> AppResult<FileInfo> {
        if !ConfigurationService::settings(repo).await?.file_uploads_enabled {
            return Err(AppError::Forbidden(MSG_UPLOADS_DISABLED.to_string()));
        }

        let file = upload
            .file
            .ok_or_else(|| AppError::Invalid(FieldErrors::single(fields::FILE, MSG_NO_FILE)))?;
        let content_type = if file.content_type.trim().is_empty() {
            FALLBACK_CONTENT_TYPE.to_string()
        } else {
            file.content_type
        };

        validation::file::validate(&file.filename, &content_type, file.data.len(), max_size)
            .into_result()?;
        let (hackathon_id, project_id) = Self::attachment(repo, upload.hackathon_id, upload.project_id).await?;

        let info = repo
            .create_file(NewFile {
                id: generate_hex_id(FILE_ID_BYTES),
                filename: file.filename,
                data: file.data,
                content_type,
                user_id: uploader.id,
                hackathon_id,
                project_id,
            })
            .await?;

        let entry = AuditEntry::new(
            audit_actions::UPLOAD,
            resource_types::FILE,
            format!("File uploaded: {} ({} bytes)", info.filename, info.size),
        )
        .actor(uploader.id)
        .resource(info.id.as_str());
        AuditService::record(repo, entry, client).await;

        Ok(info)
    }

    /// Resolve the hackathon and project an upload is attached to
    ///
    /// Both are optional. A project given without a hackathon attaches the
    /// file to the project's hackathon as well.
    async fn attachment(
        repo: &dyn Repository,
        hackathon_id: Option<String>,
        project_id: Option<String>,
    ) -> AppResult<(Option<String>, Option<i64>)> {
        let mut errors = FieldErrors::new();

        let hackathon = match hackathon_id.as_deref().map(str::trim) {
            Some(id) => {
                let hackathon = repo.find_hackathon(id).await?;
                if hackathon.is_none() {
                    errors.add(fields::HACKATHON_ID, MSG_UNKNOWN_HACKATHON);
                }
                hackathon
            }
            None => None,
        };

        let project = match project_id.as_deref().map(str::trim) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(id) => {
                    let project = repo.find_project(id).await?;
                    match &project {
                        None => errors.add(fields::PROJECT_ID, MSG_UNKNOWN_PROJECT),
                        Some(p) if hackathon.as_ref().is_some_and(|h| h.id != p.hackathon_id) => {
                            errors.add(fields::PROJECT_ID, MSG_PROJECT_OUTSIDE_HACKATHON)
                        }
                        Some(_) => {}
                    }
                    project
                }
                Err(_) => {
                    errors.add(fields::PROJECT_ID, MSG_INVALID_PROJECT_ID);
                    None
                }
            },
            None => None,
        };

        errors.into_result()?;

        let hackathon_id = hackathon
            .map(|h| h.id)
            .or_else(|| project.as_ref().map(|p| p.hackathon_id.clone()));
        Ok((hackathon_id, project.map(|p| p.id)))
    }

    /// Delete a file; only its uploader or an owner may do so
    pub async fn delete(
        repo: &dyn Repository,
        id: &str,
        actor: &User,
        client: &ClientInfo,
    ) -> AppResult<FileInfo> {
        let file = Self::get(repo, id).await?;
        if file.user_id != actor.id && !actor.is_owner() {
            return Err(AppError::Forbidden(
                "You can only delete your own files".to_string(),
            ));
        }

        repo.delete_file(&file.id).await?;

        let entry = AuditEntry::new(
            audit_actions::DELETE,
            resource_types::FILE,
            format!("File deleted: {}", file.filename),
        )
        .actor(actor.id)
        .resource(file.id.as_str());
        AuditService::record(repo, entry, client).await;

        Ok(FileInfo::from(&file))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use chrono::Utc;

    use super::*;
    use crate::db::MockRepository;
    use crate::test_utils::fixtures;

    const TEN_MB: usize = 10 * 1024 * 1024;

    fn stored(file: &NewFile) -> File {
        File {
            id: file.id.clone(),
            filename: file.filename.clone(),
            data: file.data.clone(),
            content_type: file.content_type.clone(),
            size: file.data.len() as i64,
            user_id: file.user_id,
            hackathon_id: file.hackathon_id.clone(),
            project_id: file.project_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn upload(data: Vec<u8>) -> FileUpload {
        FileUpload {
            file: Some(UploadedFile {
                filename: "slides.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                data,
            }),
            hackathon_id: None,
            project_id: None,
        }
    }

    #[tokio::test]
    async fn test_upload_then_download_returns_same_content() {
        let uploader = fixtures::hacker();
        let store: Arc<Mutex<Vec<File>>> = Arc::default();
        let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();

        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().returning(|| Ok(None));
        let writer = Arc::clone(&store);
        repo.expect_create_file().once().returning(move |file| {
            let file = stored(&file);
            let info = FileInfo::from(&file);
            writer.lock().unwrap().push(file);
            Ok(info)
        });
        let reader = Arc::clone(&store);
        repo.expect_find_file().returning(move |id| {
            Ok(reader.lock().unwrap().iter().find(|f| f.id == id).cloned())
        });
        repo.expect_insert_audit_log()
            .once()
            .withf(|row| row.action == "upload" && row.resource_type == "file")
            .return_once(|_| Ok(()));

        let info = FileService::upload(&repo, upload(content.clone()), &uploader, TEN_MB, &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(info.id.len(), 32);

        let downloaded = FileService::get(&repo, &info.id).await.unwrap();
        assert_eq!(downloaded.data, content);
        assert_eq!(downloaded.filename, "slides.pdf");
        assert_eq!(downloaded.content_type, "application/pdf");
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_create_file().never();

        let result =
            FileService::upload(&repo, FileUpload::default(), &fixtures::hacker(), TEN_MB, &ClientInfo::default())
                .await;
        assert!(matches!(result, Err(AppError::Invalid(errors)) if errors.get("file") == [MSG_NO_FILE]));
    }

    #[tokio::test]
    async fn test_oversized_file_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_create_file().never();

        let result =
            FileService::upload(&repo, upload(vec![0; TEN_MB + 1]), &fixtures::hacker(), TEN_MB, &ClientInfo::default())
                .await;
        assert!(
            matches!(result, Err(AppError::Invalid(errors)) if errors.get("file") == ["File too large (max 10MB)"])
        );
    }

    #[tokio::test]
    async fn test_unknown_project_is_rejected_before_insert() {
        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_find_project()
            .withf(|id| *id == 999_999)
            .return_once(|_| Ok(None));
        repo.expect_create_file().never();

        let mut submitted = upload(b"hello".to_vec());
        submitted.project_id = Some("999999".to_string());

        let result = FileService::upload(&repo, submitted, &fixtures::hacker(), TEN_MB, &ClientInfo::default()).await;
        assert!(
            matches!(result, Err(AppError::Invalid(errors)) if errors.get(fields::PROJECT_ID) == [MSG_UNKNOWN_PROJECT])
        );
    }

    #[tokio::test]
    async fn test_unparsable_project_id_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_find_project().never();
        repo.expect_create_file().never();

        let mut submitted = upload(b"hello".to_vec());
        submitted.project_id = Some("seven".to_string());

        let result = FileService::upload(&repo, submitted, &fixtures::hacker(), TEN_MB, &ClientInfo::default()).await;
        assert!(
            matches!(result, Err(AppError::Invalid(errors)) if errors.get(fields::PROJECT_ID) == [MSG_INVALID_PROJECT_ID])
        );
    }

    #[tokio::test]
    async fn test_project_from_another_hackathon_is_rejected() {
        let hackathon = fixtures::hackathon(fixtures::owner().id);
        let project = fixtures::project(7, "ffffffffffff", None);

        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_find_hackathon().return_once(move |_| Ok(Some(hackathon)));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_create_file().never();

        let mut submitted = upload(b"hello".to_vec());
        submitted.hackathon_id = Some("a1b2c3d4e5f6".to_string());
        submitted.project_id = Some("7".to_string());

        let result = FileService::upload(&repo, submitted, &fixtures::hacker(), TEN_MB, &ClientInfo::default()).await;
        assert!(matches!(
            result,
            Err(AppError::Invalid(errors)) if errors.get(fields::PROJECT_ID) == [MSG_PROJECT_OUTSIDE_HACKATHON]
        ));
    }

    #[tokio::test]
    async fn test_project_attachment_inherits_its_hackathon() {
        let project = fixtures::project(7, "a1b2c3d4e5f6", None);

        let mut repo = MockRepository::new();
        repo.expect_canonical_configuration().return_once(|| Ok(None));
        repo.expect_find_project().return_once(move |_| Ok(Some(project)));
        repo.expect_create_file()
            .once()
            .withf(|file| file.hackathon_id.as_deref() == Some("a1b2c3d4e5f6") && file.project_id == Some(7))
            .returning(|file| Ok(FileInfo::from(&stored(&file))));
        repo.expect_insert_audit_log().return_once(|_| Ok(()));

        let mut submitted = upload(b"hello".to_vec());
        submitted.project_id = Some("7".to_string());

        let info = FileService::upload(&repo, submitted, &fixtures::hacker(), TEN_MB, &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(info.project_id, Some(7));
    }

    #[tokio::test]
    async fn test_delete_by_stranger_is_forbidden() {
        let uploader = fixtures::hacker();
        let file = stored(&NewFile {
            id: "ab".repeat(16),
            filename: "notes.txt".to_string(),
            data: b"hello".to_vec(),
            content_type: "text/plain".to_string(),
            user_id: uploader.id,
            hackathon_id: None,
            project_id: None,
        });

        let mut repo = MockRepository::new();
        repo.expect_find_file().return_once(move |_| Ok(Some(file)));
        repo.expect_delete_file().never();

        let result = FileService::delete(&repo, &"ab".repeat(16), &fixtures::hacker(), &ClientInfo::default()).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_owner_may_delete_any_file() {
        let file = stored(&NewFile {
            id: "cd".repeat(16),
            filename: "notes.txt".to_string(),
            data: b"hello".to_vec(),
            content_type: "text/plain".to_string(),
            user_id: fixtures::hacker().id,
            hackathon_id: None,
            project_id: None,
        });

        let mut repo = MockRepository::new();
        repo.expect_find_file().return_once(move |_| Ok(Some(file)));
        repo.expect_delete_file().once().return_once(|_| Ok(()));
        repo.expect_insert_audit_log().once().return_once(|_| Ok(()));

        let deleted = FileService::delete(&repo, &"cd".repeat(16), &fixtures::owner(), &ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(deleted.filename, "notes.txt");
    }
}
