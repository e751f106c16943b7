//! Read-only admin pages over the uploaded image table.

use crate::AppState;
use crate::api::error::AppError;
use crate::config::AppConfig;
use crate::models::ImageSummary;
use crate::utils::html::{escape, format_size};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AdminListParams {
    /// 1-based page number
    pub p: Option<u64>,
}

const PAGE_STYLE: &str = r#"
    body { font-family: system-ui, sans-serif; margin: 0; color: #333; }
    header { background: #417690; color: #fff; padding: .75rem 2rem; }
    header a { color: #f5dd5d; text-decoration: none; font-size: 1.25rem; }
    main { margin: 2rem; }
    h1 { margin: 0 0 1rem 0; font-weight: 400; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border-bottom: 1px solid #ddd; text-align: left; padding: .5rem; }
    th { background: #f6f6f6; }
    .paginator { margin: 1rem 0; }
    .preview { max-width: 480px; max-height: 480px; border: 1px solid #ddd; }
    dt { font-weight: 600; }
    dd { margin: 0 0 .75rem 0; }
"#;

fn render_page(config: &AppConfig, body: &str) -> Html<String> {
    Html(format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{title}</title>
  <style>{style}</style>
</head>
<body>
  <header><a href="{admin}">{header}</a></header>
  <main>
{body}
  </main>
</body>
</html>
"#,
        title = escape(&config.admin_site.site_title),
        style = PAGE_STYLE,
        admin = escape(&config.admin_url("")),
        header = escape(&config.admin_site.site_header),
        body = body,
    ))
}

fn render_rows(config: &AppConfig, images: &[ImageSummary]) -> String {
    let mut rows = String::new();
    for image in images {
        let display_name = if image.name.is_empty() {
            "(unnamed)".to_string()
        } else {
            escape(&image.name)
        };
        rows.push_str(&format!(
            "<tr><td>{id}</td><td><a href=\"{href}\">{name}</a></td><td>{ct}</td><td>{size}</td></tr>",
            id = image.id,
            href = escape(&config.admin_url(&format!("/images/{}", image.id))),
            name = display_name,
            ct = escape(&image.content_type),
            size = format_size(image.size),
        ));
    }
    rows
}

pub async fn admin_index(
    State(state): State<AppState>,
    Query(params): Query<AdminListParams>,
) -> Result<Html<String>, AppError> {
    let config = &state.config;
    let per_page = config.admin_page_size.max(1);
    let total = state.images.count().await?;
    let pages = total.div_ceil(per_page).max(1);
    let page = params.p.unwrap_or(1).clamp(1, pages);

    let images = state.images.list((page - 1) * per_page, per_page).await?;

    let mut paginator = format!("{} uploaded images", total);
    if pages > 1 {
        if page > 1 {
            paginator.push_str(&format!(
                " · <a href=\"{}?p={}\">previous</a>",
                escape(&config.admin_url("")),
                page - 1
            ));
        }
        paginator.push_str(&format!(" · page {} of {}", page, pages));
        if page < pages {
            paginator.push_str(&format!(
                " · <a href=\"{}?p={}\">next</a>",
                escape(&config.admin_url("")),
                page + 1
            ));
        }
    }

    let body = format!(
        r#"    <h1>{index_title}</h1>
    <h2>Uploaded images</h2>
    <table>
      <thead><tr><th>ID</th><th>Name</th><th>Content type</th><th>Size</th></tr></thead>
      <tbody>{rows}</tbody>
    </table>
    <p class="paginator">{paginator}</p>"#,
        index_title = escape(&config.admin_site.index_title),
        rows = render_rows(config, &images),
        paginator = paginator,
    );

    Ok(render_page(config, &body))
}

pub async fn admin_image_detail(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Html<String>, AppError> {
    let config = &state.config;
    let image = state
        .images
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Uploaded image {} not found", id)))?;

    let data_url = escape(&config.admin_url(&format!("/images/{}/data", image.id)));
    let is_image = image
        .content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.type_() == mime::IMAGE);
    let preview = if is_image {
        format!(
            "<img class=\"preview\" src=\"{}\" alt=\"{}\" />",
            data_url,
            escape(&image.name)
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"    <h1>Uploaded image #{id}</h1>
    <dl>
      <dt>Name</dt><dd>{name}</dd>
      <dt>Content type</dt><dd>{ct}</dd>
      <dt>Size</dt><dd>{size} ({bytes} bytes)</dd>
      <dt>Data</dt><dd><a href="{data_url}">download</a></dd>
    </dl>
    {preview}"#,
        id = image.id,
        name = escape(&image.name),
        ct = escape(&image.content_type),
        size = format_size(image.data.len() as i64),
        bytes = image.data.len(),
        data_url = data_url,
        preview = preview,
    );

    Ok(render_page(config, &body))
}

pub async fn admin_image_data(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let image = state
        .images
        .find(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Uploaded image {} not found", id)))?;

    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    Ok(([(header::CONTENT_TYPE, content_type)], image.data).into_response())
}
