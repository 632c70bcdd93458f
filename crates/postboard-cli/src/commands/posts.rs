//! Post browsing commands.

use super::App;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use postboard_auth::{AuthError, Post, LOAD_POSTS_FALLBACK};

fn explain(error: AuthError) -> anyhow::Error {
    match error {
        AuthError::Unauthorized { .. } => {
            anyhow::anyhow!("Session expired. Run 'postboard login' again")
        }
        other => anyhow::anyhow!(other.user_message(LOAD_POSTS_FALLBACK)),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// List posts.
pub async fn posts_list(app: &App, format: &OutputFormat) -> Result<()> {
    let posts = app.posts.list().await.map_err(explain)?;

    match format {
        OutputFormat::Text => {
            if posts.is_empty() {
                println!("No posts found");
                return Ok(());
            }
            println!("{:<12} {:<40} {:<12} {}", "ID", "Title", "Author", "Created");
            println!("{}", "-".repeat(90));
            for post in &posts {
                println!(
                    "{:<12} {:<40} {:<12} {}",
                    truncate(&post.id, 12),
                    truncate(&post.title, 40),
                    post.author_id.as_deref().unwrap_or("-"),
                    post.created_at.as_deref().unwrap_or("-"),
                );
            }
        }
        OutputFormat::Json => output::print_json(&posts),
    }

    Ok(())
}

fn print_post(post: &Post) {
    output::print_heading(&post.title);
    output::print_row("ID", &post.id);
    if let Some(author) = &post.author_id {
        output::print_row("Author", author);
    }
    if let Some(created_at) = &post.created_at {
        output::print_row("Created", created_at);
    }
    if let Some(body) = &post.body {
        println!();
        println!("{}", body);
    }
}

/// Show one post.
pub async fn posts_show(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let post = app.posts.show(id).await.map_err(explain)?;
    match format {
        OutputFormat::Text => print_post(&post),
        OutputFormat::Json => output::print_json(&post),
    }

    Ok(())
}
