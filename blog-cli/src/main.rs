use std::path::PathBuf;

use anyhow::Context;
use blog_client::{BlogClient, CreatePost, DEFAULT_TOKEN_FILE, PostStatus, TokenStore, UpdatePost};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "blog-cli", about = "Read and manage the tutoring blog")]
struct Cli {
    #[arg(short, long, env = "BLOG_SERVER", default_value = "http://127.0.0.1:8080")]
    server: String,

    #[arg(long, env = "BLOG_TOKEN_FILE", default_value = DEFAULT_TOKEN_FILE)]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and save the token for later commands
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List publicly visible posts
    List,
    /// Show one visible post
    Show { slug: String },
    /// List comments on a slug
    Comments { slug: String },
    /// Add a comment to a slug
    Comment {
        slug: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        text: String,
    },
    /// Create a post (draft unless --publish or --schedule-at)
    Create {
        #[arg(long)]
        slug: String,
        #[arg(long)]
        title: String,
        #[command(flatten)]
        body: BodyArgs,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long, conflicts_with = "schedule_at")]
        publish: bool,
        /// RFC 3339 instant, e.g. 2026-11-01T09:00:00Z
        #[arg(long)]
        schedule_at: Option<DateTime<Utc>>,
    },
    /// Change fields of an existing post
    Update {
        id: i64,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        body: BodyArgs,
        /// Replaces all tags
        #[arg(long = "tag")]
        tags: Option<Vec<String>>,
    },
    /// Make a post public now
    Publish { id: i64 },
    /// Return a post to draft
    Unpublish { id: i64 },
    /// Publish a draft at a future instant
    Schedule {
        id: i64,
        /// RFC 3339 instant
        #[arg(long)]
        at: DateTime<Utc>,
    },
    /// Delete a post; its comments stay
    Delete { id: i64 },
}

#[derive(Args, Debug)]
struct BodyArgs {
    /// Post body as HTML
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// Read the post body from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
    #[arg(long)]
    excerpt: Option<String>,
    #[arg(long)]
    featured_image: Option<String>,
    #[arg(long)]
    meta_description: Option<String>,
}

impl BodyArgs {
    fn content(&self) -> anyhow::Result<Option<String>> {
        match (&self.content, &self.content_file) {
            (Some(content), _) => Ok(Some(content.clone())),
            (None, Some(path)) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("reading {}", path.display())),
            (None, None) => Ok(None),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let mut client = BlogClient::new(&args.server)?
        .with_token_store(TokenStore::new(&args.token_file))?;

    match args.command {
        Command::Login { email, password } => {
            let auth = client.login(&email, &password).await?;
            println!(
                "Logged in; token valid for {}s, saved to {}",
                auth.expires_in,
                args.token_file.display()
            );
        }
        Command::List => {
            let posts = client.list_posts().await?;
            println!("Posts ({})", posts.len());
            for post in posts {
                println!(
                    "- {} | {} | {} | {}",
                    post.date.format("%Y-%m-%d"),
                    post.slug,
                    post.title,
                    post.read_time.as_deref().unwrap_or("-")
                );
            }
        }
        Command::Show { slug } => {
            let article = client.get_post(&slug).await?;
            println!("{}", article.title);
            println!(
                "by {} on {} ({})",
                article.author,
                article.published_at.format("%Y-%m-%d"),
                article.read_time
            );
            if !article.tags.is_empty() {
                println!("tags: {}", article.tags.join(", "));
            }
            println!();
            println!("{}", article.content);
        }
        Command::Comments { slug } => {
            let comments = client.list_comments(&slug).await?;
            println!("Comments on {} ({})", slug, comments.len());
            for c in comments {
                println!(
                    "- {} at {}: {}",
                    c.author_name,
                    c.created_at.to_rfc3339(),
                    c.comment
                );
            }
        }
        Command::Comment { slug, name, text } => {
            let comment = client.add_comment(&slug, &name, &text).await?;
            println!("Comment {} added", comment.id);
        }
        Command::Create {
            slug,
            title,
            body,
            tags,
            publish,
            schedule_at,
        } => {
            let status = match (publish, schedule_at) {
                (_, Some(_)) => Some(PostStatus::Scheduled),
                (true, None) => Some(PostStatus::Published),
                (false, None) => None,
            };
            let post = client
                .create_post(&CreatePost {
                    slug,
                    title,
                    content: body.content()?.unwrap_or_default(),
                    excerpt: body.excerpt,
                    featured_image: body.featured_image,
                    meta_description: body.meta_description,
                    tags,
                    status,
                    scheduled_at: schedule_at,
                })
                .await?;
            println!("Post created: {post}");
        }
        Command::Update {
            id,
            slug,
            title,
            body,
            tags,
        } => {
            let changes = UpdatePost {
                slug,
                title,
                content: body.content()?,
                excerpt: body.excerpt,
                featured_image: body.featured_image,
                meta_description: body.meta_description,
                tags,
                ..Default::default()
            };
            let post = client.update_post(id, &changes).await?;
            println!("Post updated: {post}");
        }
        Command::Publish { id } => {
            let post = client
                .update_post(id, &UpdatePost::status(PostStatus::Published))
                .await?;
            println!("Post published: {post}");
        }
        Command::Unpublish { id } => {
            let post = client
                .update_post(id, &UpdatePost::status(PostStatus::Draft))
                .await?;
            println!("Post unpublished: {post}");
        }
        Command::Schedule { id, at } => {
            let post = client.update_post(id, &UpdatePost::schedule(at)).await?;
            println!("Post scheduled: {post}");
        }
        Command::Delete { id } => {
            client.delete_post(id).await?;
            println!("Post {id} deleted");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_schedule_instant() {
        let cli = Cli::try_parse_from([
            "blog-cli",
            "schedule",
            "7",
            "--at",
            "2026-11-01T09:00:00Z",
        ])
        .unwrap();
        match cli.command {
            Command::Schedule { id, at } => {
                assert_eq!(id, 7);
                assert_eq!(at.to_rfc3339(), "2026-11-01T09:00:00+00:00");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn publish_and_schedule_conflict() {
        let parsed = Cli::try_parse_from([
            "blog-cli",
            "create",
            "--slug",
            "a",
            "--title",
            "A",
            "--publish",
            "--schedule-at",
            "2026-11-01T09:00:00Z",
        ]);
        assert!(parsed.is_err());
    }
}
