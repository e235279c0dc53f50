// crates/edge/src/cli.rs

use crate::settings::load_settings;
use crate::Error;
use adapt::http::build_app;
use adapt::loader::load_themes;
use adapt::service::{MemoryThemeService, ThemeService, CURRENT};
use chrono::Utc;
use clap::{builder::ValueHint, Args, Parser, Subcommand};
use domain::setting::Settings;
use serve::builder::{BuildOptions, ThemeBuilder};
use serve::factory::{AssetFactory, SiteUrl, UploadUrl};
use serve::resolver::{resolve_asset, AssetResponse};
use serve::variables::{StaticVariables, VariableProviderRegistry};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

pub type Result<T> = std::result::Result<T, Error>;

/// Forum theme CLI
#[tokio::main(flavor = "multi_thread")]
#[tracing::instrument(skip_all)]
pub async fn start() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(cmd) => do_serve(cmd).await,
        Commands::Render(cmd) => do_render(cmd).await,
    };

    result.map_or_else(
        |e| {
            error!("forumtheme failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        },
        |_| ExitCode::SUCCESS,
    )
}

#[tracing::instrument(skip_all)]
async fn do_serve(cmd: ServeCmd) -> Result<()> {
    let then = Utc::now();
    let process = StartProcess::<CommandIssued>::parse_settings(&cmd.settings)?;
    info!(
        "Settings parsed in {} milliseconds",
        Utc::now().timestamp_millis() - then.timestamp_millis()
    );

    let then = Utc::now();
    let process = process.load_themes()?;
    info!(
        "Themes loaded in {} milliseconds",
        Utc::now().timestamp_millis() - then.timestamp_millis()
    );

    process.serve().await
}

#[tracing::instrument(skip_all)]
async fn do_render(cmd: RenderCmd) -> Result<()> {
    let process = StartProcess::<CommandIssued>::parse_settings(&cmd.settings)?.load_themes()?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    process.render_to(&cmd, &mut out).await
}

#[derive(Parser, Debug)]
#[command(name = "forumtheme", version, about = "Forum theme asset server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the theme API over HTTP
    Serve(ServeCmd),

    /// Print one asset of a theme, e.g. `variables.json` or `header`
    Render(RenderCmd),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Settings file (or set FORUMTHEME_CONFIG)
    #[arg(
        long,
        short,
        value_name = "FILE",
        env = "FORUMTHEME_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Directory holding one folder per theme; overrides the settings file
    #[arg(
        long,
        value_name = "DIR",
        env = "FORUMTHEME_THEMES_DIR",
        value_hint = ValueHint::DirPath
    )]
    pub themes_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ServeCmd {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args, Debug)]
pub struct RenderCmd {
    #[command(flatten)]
    pub settings: SettingsArgs,

    /// Theme ID, or `current`
    #[arg(long, default_value = CURRENT)]
    pub theme: String,

    /// Skip variables contributed by addons
    #[arg(long)]
    pub no_addon_variables: bool,

    /// Asset name, optionally with the extension to render it as
    #[arg(value_name = "ASSET")]
    pub asset_key: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Start process state machine
// ─────────────────────────────────────────────────────────────────────────────

trait ProcessState {}

struct CommandIssued;

struct SettingsLoaded {
    settings: Settings,
}

struct ThemesLoaded {
    settings: Settings,
    themes: Arc<dyn ThemeService>,
}

impl ProcessState for CommandIssued {}
impl ProcessState for SettingsLoaded {}
impl ProcessState for ThemesLoaded {}

struct StartProcess<S: ProcessState> {
    state: S,
}

impl StartProcess<CommandIssued> {
    #[tracing::instrument(skip_all)]
    fn parse_settings(args: &SettingsArgs) -> Result<StartProcess<SettingsLoaded>> {
        let settings = load_settings(args.config.as_deref(), args.themes_dir.clone())?;
        Ok(StartProcess {
            state: SettingsLoaded { settings },
        })
    }
}

impl StartProcess<SettingsLoaded> {
    /// Load theme sources and wire the asset pipeline around them.
    #[tracing::instrument(skip_all)]
    fn load_themes(self) -> Result<StartProcess<ThemesLoaded>> {
        let settings = self.state.settings;
        let dir = &settings.themes.dir;
        if !dir.is_dir() {
            return Err(Error::MissingThemesDir(dir.display().to_string()));
        }
        let sources = load_themes(dir)?;

        let factory = AssetFactory::new(
            SiteUrl::new(settings.site.base_url.clone()),
            UploadUrl::new(settings.site.upload_base_url.clone()),
            settings.cache_buster(),
            Arc::new(settings.config_store()),
        );

        let mut registry = VariableProviderRegistry::new();
        for (name, variables) in &settings.addon_variables {
            registry.register(Arc::new(StaticVariables::new(
                name.clone(),
                variables.clone(),
            )));
        }

        let builder = ThemeBuilder::new(Arc::new(factory), Arc::new(registry));
        let service =
            MemoryThemeService::new(builder, sources, settings.themes.current.clone())?;

        Ok(StartProcess {
            state: ThemesLoaded {
                settings,
                themes: Arc::new(service),
            },
        })
    }
}

impl StartProcess<ThemesLoaded> {
    #[tracing::instrument(skip_all)]
    async fn serve(self) -> Result<()> {
        let server = &self.state.settings.server;
        let addr = SocketAddr::new(server.ip, server.port);
        let app = build_app(self.state.themes);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(%addr, "theme API listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        info!("theme API stopped");
        Ok(())
    }

    async fn render_to<W: Write>(&self, cmd: &RenderCmd, out: &mut W) -> Result<()> {
        let options = BuildOptions {
            allow_addon_variables: !cmd.no_addon_variables,
        };
        let theme = self.state.themes.get_theme(&cmd.theme, options).await?;

        match resolve_asset(&theme, &cmd.asset_key)? {
            AssetResponse::Rendered(r) => out.write_all(&r.body)?,
            AssetResponse::Envelope(v) => {
                serde_json::to_writer_pretty(&mut *out, &v)?;
                writeln!(out)?;
            }
        }
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_args_parse() {
        let cli = Cli::try_parse_from([
            "forumtheme",
            "render",
            "--themes-dir",
            "/srv/themes",
            "--theme",
            "lavender",
            "variables.json",
        ])
        .unwrap();
        let Commands::Render(cmd) = cli.command else {
            panic!("expected render")
        };
        assert_eq!(cmd.theme, "lavender");
        assert_eq!(cmd.asset_key, "variables.json");
        assert!(!cmd.no_addon_variables);
        assert_eq!(cmd.settings.themes_dir, Some(PathBuf::from("/srv/themes")));
    }

    fn render_cmd(dir: &TempDir, asset_key: &str) -> RenderCmd {
        RenderCmd {
            settings: SettingsArgs {
                config: None,
                themes_dir: Some(dir.path().to_path_buf()),
            },
            theme: CURRENT.to_string(),
            no_addon_variables: false,
            asset_key: asset_key.to_string(),
        }
    }

    #[tokio::test]
    async fn renders_asset_from_theme_directory() {
        let root = TempDir::new().unwrap();
        let theme = root.path().join("lavender");
        fs::create_dir(&theme).unwrap();
        fs::write(theme.join("variables.neon"), "color: purple\n").unwrap();

        let cmd = render_cmd(&root, "variables.json");
        let process = StartProcess::<CommandIssued>::parse_settings(&cmd.settings)
            .unwrap()
            .load_themes()
            .unwrap();

        let mut out = Vec::new();
        process.render_to(&cmd, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), r#"{"color":"purple"}"#);

        let cmd = render_cmd(&root, "variables.neon");
        let mut out = Vec::new();
        process.render_to(&cmd, &mut out).await.unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "color: purple\n");
    }

    #[test]
    fn missing_themes_dir_is_reported() {
        let root = TempDir::new().unwrap();
        let cmd = render_cmd(&root, "header");
        let mut settings = cmd.settings.clone();
        settings.themes_dir = Some(root.path().join("absent"));

        let err = StartProcess::<CommandIssued>::parse_settings(&settings)
            .unwrap()
            .load_themes()
            .err()
            .unwrap();
        assert!(matches!(err, Error::MissingThemesDir(_)));
    }
}
