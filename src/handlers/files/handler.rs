//! File handler implementations

use axum::{
    extract::{Multipart, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    handlers::page::{flash_message, redirect, refuse, Page},
    middleware::RequestContext,
    models::{File, FileInfo},
    services::{
        file_service::{FileUpload, UploadOptions},
        FileService,
    },
    state::AppState,
    utils::MultipartForm,
    validation::file::human_size,
};

#[derive(Debug, Serialize)]
pub struct FileList {
    pub files: Vec<FileInfo>,
}

pub async fn list_files(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<FileList>> {
    let files = FileService::list(state.repo()).await?;
    Ok(Page::new(&ctx, "files/index", FileList { files }))
}

pub async fn new_file(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Page<UploadOptions>> {
    let options = FileService::upload_options(state.repo()).await?;
    Ok(Page::new(&ctx, "files/new", options))
}

/// Store an upload and return to the project it was attached to, if any
pub async fn upload_file(
    State(state): State<AppState>,
    ctx: RequestContext,
    multipart: Multipart,
) -> AppResult<Response> {
    let uploader = ctx.user()?.clone();
    let max_size = state.config().uploads.max_file_size_bytes;

    let mut form = match MultipartForm::read(multipart).await {
        Ok(form) => form,
        Err(AppError::PayloadTooLarge(_)) => {
            return Ok(refuse(&ctx, "/files/new", format!("File too large (max {})", human_size(max_size))));
        }
        Err(e) => return Err(e),
    };

    let upload = FileUpload {
        file: form.take_file("file"),
        hackathon_id: form.optional_text("hackathon_id").map(str::to_string),
        project_id: form.optional_text("project_id").map(str::to_string),
    };

    match FileService::upload(state.repo(), upload, &uploader, max_size, &ctx.client).await {
        Ok(info) => {
            ctx.success("File uploaded successfully");
            match (info.hackathon_id, info.project_id) {
                (Some(hackathon_id), Some(project_id)) => {
                    Ok(redirect(format!("/hackathons/{hackathon_id}/projects/{project_id}")))
                }
                _ => Ok(redirect("/files")),
            }
        }
        Err(e @ (AppError::Invalid(_) | AppError::Forbidden(_))) => {
            Ok(refuse(&ctx, "/files/new", flash_message(&e).unwrap_or_default()))
        }
        Err(e) => Err(e),
    }
}

pub async fn show_file(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(file_id): Path<String>,
) -> AppResult<Page<File>> {
    let file = FileService::get(state.repo(), &file_id).await?;
    Ok(Page::new(&ctx, "files/show", file))
}

/// Send the stored bytes as an attachment
pub async fn download_file(State(state): State<AppState>, Path(file_id): Path<String>) -> AppResult<Response> {
    let file = FileService::get(state.repo(), &file_id).await?;

    let disposition = format!("attachment; filename=\"{}\"", attachment_name(&file.filename));
    let headers = [
        (CONTENT_TYPE, file.content_type),
        (CONTENT_DISPOSITION, disposition),
        (CONTENT_LENGTH, file.data.len().to_string()),
    ];
    Ok((headers, file.data).into_response())
}

/// Only the uploader or an owner may delete; everyone else gets a 403
pub async fn delete_file(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(file_id): Path<String>,
) -> AppResult<Response> {
    let actor = ctx.user()?.clone();
    FileService::delete(state.repo(), &file_id, &actor, &ctx.client).await?;

    ctx.success("File deleted successfully");
    Ok(redirect("/files"))
}

/// Filename safe to place inside a quoted header parameter
fn attachment_name(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use chrono::Utc;
    use tower::ServiceExt;

    use super::*;
    use crate::constants::REQUEST_BODY_OVERHEAD_BYTES;
    use crate::db::MockRepository;
    use crate::test_utils::{fixtures, test_app};

    fn stored_file(owner: uuid::Uuid) -> File {
        File {
            id: "0123456789abcdef0123456789abcdef".to_string(),
            filename: "slides.pdf".to_string(),
            data: b"%PDF-1.4".to_vec(),
            content_type: "application/pdf".to_string(),
            size: 8,
            user_id: owner,
            hackathon_id: None,
            project_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const BOUNDARY: &str = "hackhub-boundary";

    /// Multipart body with one file part followed by text fields
    fn multipart_body(data: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\n\
             Content-Type: text/plain\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
        for (name, value) in fields {
            body.extend_from_slice(
                format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                    .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(cookie: String, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/files")
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_to_unknown_project_is_flashed() {
        let uploader = fixtures::hacker();
        let cookie = test_app::session_cookie(&uploader);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(uploader)));
        repo.expect_canonical_configuration().returning(|| Ok(None));
        repo.expect_find_project().return_once(|_| Ok(None));
        repo.expect_create_file().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(upload_request(cookie, multipart_body(b"hello", &[("project_id", "999999")])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/files/new");
        assert_eq!(test_app::flash_messages(&response), ["Project not found"]);
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_flashed() {
        let uploader = fixtures::hacker();
        let cookie = test_app::session_cookie(&uploader);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(uploader)));
        repo.expect_create_file().never();

        let mut config = test_app::test_config();
        config.uploads.max_file_size_bytes = 1024;
        let oversized = vec![b'x'; config.uploads.max_file_size_bytes + REQUEST_BODY_OVERHEAD_BYTES + 1];

        let app = test_app::create_test_app_with_config(repo, config);
        let response = app
            .oneshot(upload_request(cookie, multipart_body(&oversized, &[])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/files/new");
        assert_eq!(test_app::flash_messages(&response), ["File too large (max 1KB)"]);
    }

    #[test]
    fn test_attachment_name_strips_quotes() {
        assert_eq!(attachment_name("my \"best\" deck.pdf"), "my best deck.pdf");
        assert_eq!(attachment_name("a\r\nb.txt"), "ab.txt");
    }

    #[tokio::test]
    async fn test_download_sets_attachment_headers() {
        let viewer = fixtures::hacker();
        let cookie = test_app::session_cookie(&viewer);
        let file = stored_file(viewer.id);

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(viewer)));
        repo.expect_find_file().return_once(move |_| Ok(Some(file)));

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/files/0123456789abcdef0123456789abcdef/download")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"slides.pdf\""
        );
        assert_eq!(response.headers()[header::CONTENT_LENGTH], "8");
    }

    #[tokio::test]
    async fn test_delete_by_stranger_is_forbidden() {
        let viewer = fixtures::hacker();
        let cookie = test_app::session_cookie(&viewer);
        let file = stored_file(uuid::Uuid::new_v4());

        let mut repo = MockRepository::new();
        repo.expect_find_user().return_once(move |_| Ok(Some(viewer)));
        repo.expect_find_file().return_once(move |_| Ok(Some(file)));
        repo.expect_delete_file().never();

        let app = test_app::create_test_app(repo);
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/files/0123456789abcdef0123456789abcdef")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
