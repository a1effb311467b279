use anyhow::{bail, Context, Result};
use clap::Parser;

use kata_blog::account::{AccountError, SessionStatus, SignInForm, SubmitOutcome};
use kata_blog::api::{ApiError, Article};
use kata_blog::app::App;
use kata_blog::articles::{ArticleError, EditorForm, Pagination, PublishOutcome};
use kata_blog::cli::{Cli, Commands};
use kata_blog::config::Config;
use kata_blog::logging::init_tracing;
use kata_blog::validation::{ErrorLedger, FieldName, Form};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
        config.validate()?;
    }

    let app = App::new(config).context("Failed to build HTTP client")?;
    run(&app, cli.command).await
}

async fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::List { page } => {
            let data = app.receive_articles(page).await?;
            for article in &data.articles {
                print_summary(article);
            }
            let pager = Pagination::new(page, data.articles_count);
            println!("page {}/{}", pager.current, pager.total_pages);
        }

        Commands::Show { slug } => {
            restore(app).await;
            let article = app.load_article(&slug).await.map_err(article_error)?;
            print_summary(&article);
            println!();
            println!("{}", article.body);
        }

        Commands::Login { email, password } => {
            let mut form = SignInForm::new();
            form.form.change(FieldName::Email, email).await;
            form.form.change(FieldName::Password, password).await;
            match app.sign_in(&mut form).await {
                Ok(outcome) => report_outcome(outcome, &form.form)?,
                Err(AccountError::LoginRejected { messages }) => {
                    bail!("Login error\n{}", messages.join("\n"))
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Signup {
            username,
            email,
            password,
            confirm,
            no_agree,
        } => {
            let mut form = app.sign_up_form();
            form.agreed = !no_agree;
            let confirm = confirm.unwrap_or_else(|| password.clone());
            form.form.change(FieldName::Username, username).await;
            form.form.change(FieldName::Email, email).await;
            form.form.change(FieldName::Password, password).await;
            form.form.change(FieldName::PasswordConfirm, confirm).await;
            if !form.agreed {
                bail!("Agreement to the processing of personal information is required");
            }
            let outcome = app.sign_up(&mut form).await?;
            report_outcome(outcome, &form.form)?;
        }

        Commands::Profile {
            username,
            email,
            password,
            image,
        } => {
            restore(app).await;
            let mut form = app.profile_form();
            let edits = [
                (FieldName::Username, username),
                (FieldName::Email, email),
                (FieldName::Password, password),
                (FieldName::Image, image),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    form.form.change(field, value).await;
                }
            }
            match app.update_profile(&mut form).await {
                Ok(outcome) => report_outcome(outcome, &form.form)?,
                Err(AccountError::ProfileUpdate(ApiError::Validation(errors))) => {
                    let lines: Vec<String> = errors
                        .iter()
                        .map(|(field, message)| format!("{} {}", field, message))
                        .collect();
                    bail!("Failed to complete request\n{}", lines.join("\n"))
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Publish {
            slug,
            title,
            description,
            body,
            tags,
        } => {
            restore(app).await;
            let mut editor = match &slug {
                Some(slug) => app.open_editor(slug).await.map_err(article_error)?,
                None => EditorForm::new(),
            };
            let edits = [
                (FieldName::Title, title),
                (FieldName::Description, description),
                (FieldName::Body, body),
            ];
            for (field, value) in edits {
                if let Some(value) = value {
                    editor.form.change(field, value).await;
                }
            }
            if !tags.is_empty() {
                while !editor.form.values().tags().is_empty() {
                    editor.form.remove_tag(0);
                }
                for (idx, tag) in tags.into_iter().enumerate() {
                    editor.form.add_tag();
                    editor.form.change_tag(idx, tag).await;
                }
            }
            match app.publish_article(&mut editor).await.map_err(article_error)? {
                PublishOutcome::Published(article) => println!("Published {}", article.slug),
                PublishOutcome::Invalid => bail!(ledger_text(editor.form.ledger())),
            }
        }

        Commands::Delete { slug } => {
            restore(app).await;
            app.delete_article(&slug).await.map_err(article_error)?;
            println!("Deleted {}", slug);
        }

        Commands::Favorite { slug } => {
            restore(app).await;
            let article = app.toggle_favorite(&slug).await.map_err(article_error)?;
            let mark = if article.favorited { "♥" } else { "♡" };
            println!("{} {} {}", mark, article.favorites_count, article.slug);
        }

        Commands::Logout => {
            app.sign_out();
            println!("Signed out");
        }

        Commands::Whoami => match app.restore_session().await? {
            SessionStatus::SignedIn(credentials) => {
                println!("{}", credentials.username.unwrap_or_default());
                if let Some(email) = credentials.email {
                    println!("{}", email);
                }
            }
            SessionStatus::SignedOut => println!("Session expired; signed out"),
            SessionStatus::Anonymous => println!("Not signed in"),
        },
    }
    Ok(())
}

/// Refresh the cached session; a failure only costs personalisation.
async fn restore(app: &App) {
    if let Err(e) = app.restore_session().await {
        tracing::warn!(error = %e, "Continuing with cached session");
    }
}

fn report_outcome(outcome: SubmitOutcome, form: &Form) -> Result<()> {
    match outcome {
        SubmitOutcome::Accepted(credentials) => {
            println!("Signed in as {}", credentials.username.unwrap_or_default());
            Ok(())
        }
        SubmitOutcome::Invalid | SubmitOutcome::Rejected => bail!(ledger_text(form.ledger())),
    }
}

fn ledger_text(ledger: &ErrorLedger) -> String {
    ledger
        .iter()
        .flat_map(|(path, messages)| messages.iter().map(move |m| format!("{}: {}", path, m)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn article_error(e: ArticleError) -> anyhow::Error {
    match e.details() {
        Some(details) => anyhow::anyhow!("{}\n{}", e, details),
        None => e.into(),
    }
}

fn print_summary(article: &Article) {
    let mark = if article.favorited { "♥" } else { "♡" };
    let tags: Vec<&str> = article.visible_tags().collect();
    println!(
        "{} {} {}  [{}]  by {} on {}",
        mark,
        article.favorites_count,
        article.title,
        tags.join(", "),
        article.author.username,
        article.updated_at.format("%B %e, %Y"),
    );
    if !article.description.is_empty() {
        println!("    {}", article.description);
    }
}
