//! Command dispatch: one function per subcommand.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{Edit, LayoutDocument};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{ComponentError, ComponentId, ComponentTree, TreeDisplay};

/// Settings merged with command line overrides.
#[derive(Debug)]
struct Context {
    settings: Settings,
    root: Option<String>,
    separator: String,
}

impl Context {
    fn new(cli: &Cli, settings: Settings) -> CliResult<Self> {
        let separator = cli
            .separator
            .clone()
            .unwrap_or_else(|| settings.separator.clone());
        if separator.is_empty() {
            return Err(CliError::InvalidArgs("separator must not be empty".to_string()));
        }
        let root = cli.root.clone().or_else(|| settings.root.clone());
        Ok(Self {
            settings,
            root,
            separator,
        })
    }

    fn pretty(&self, compact: bool) -> bool {
        self.settings.pretty && !compact
    }

    /// Pick the root: explicit, configured, or the document's only root.
    fn root_name(&self, document: &LayoutDocument) -> CliResult<String> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        match document.root_names().as_slice() {
            [only] => Ok(only.to_string()),
            [] => Err(ComponentError::RootNotFound("<none>".to_string()).into()),
            names => Err(CliError::Usage(format!(
                "layout has several root components ({}), choose one with --root",
                names.join(", ")
            ))),
        }
    }

    fn load(&self, file: &Path) -> CliResult<(LayoutDocument, ComponentTree)> {
        let document = LayoutDocument::load(file)?;
        let root = self.root_name(&document)?;
        let tree = document.parse_root(&root)?;
        Ok((document, tree))
    }
}

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = cli
        .project_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let settings = Settings::load(project_dir.as_deref())?;
    let ctx = Context::new(cli, settings)?;
    debug!(?ctx, "resolved context");

    match &cli.command {
        Some(Commands::Tree { file, path }) => cmd_tree(&ctx, file, path.as_deref()),
        Some(Commands::Paths { file, leaves }) => cmd_paths(&ctx, file, *leaves),
        Some(Commands::Get {
            file,
            path,
            compact,
        }) => cmd_get(&ctx, file, path.as_deref(), *compact),
        Some(Commands::Set {
            file,
            path,
            key,
            value,
            output,
        }) => {
            let edit = Edit::SetAttribute {
                path: path.clone(),
                key: key.clone(),
                value: Edit::parse_value(value),
            };
            cmd_edit(&ctx, file, &edit, output)
        }
        Some(Commands::Unset {
            file,
            path,
            key,
            output,
        }) => {
            let edit = Edit::RemoveAttribute {
                path: path.clone(),
                key: key.clone(),
            };
            cmd_edit(&ctx, file, &edit, output)
        }
        Some(Commands::Remove { file, path, output }) => {
            let edit = Edit::Remove { path: path.clone() };
            cmd_edit(&ctx, file, &edit, output)
        }
        Some(Commands::Move {
            file,
            source,
            destination,
            output,
        }) => {
            let edit = Edit::Move {
                source: source.clone(),
                destination: destination.clone(),
            };
            cmd_edit(&ctx, file, &edit, output)
        }
        Some(Commands::Config { command }) => cmd_config(&ctx, command, project_dir.as_deref()),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

#[instrument(level = "debug", skip(ctx))]
fn cmd_tree(ctx: &Context, file: &Path, path: Option<&str>) -> CliResult<()> {
    let (_, tree) = ctx.load(file)?;
    let id = resolve(ctx, &tree, path)?;
    if let Some(rendered) = tree.subtree_to_tree_string(id) {
        output::info(&rendered);
    }
    Ok(())
}

#[instrument(level = "debug", skip(ctx))]
fn cmd_paths(ctx: &Context, file: &Path, leaves: bool) -> CliResult<()> {
    let (_, tree) = ctx.load(file)?;
    let paths = if leaves {
        tree.leaf_paths(&ctx.separator)
    } else {
        tree.paths(&ctx.separator)
    };
    for path in paths {
        output::info(&path);
    }
    Ok(())
}

#[instrument(level = "debug", skip(ctx))]
fn cmd_get(ctx: &Context, file: &Path, path: Option<&str>, compact: bool) -> CliResult<()> {
    let (_, tree) = ctx.load(file)?;
    output::info(&render_component(ctx, &tree, path, compact)?);
    Ok(())
}

/// Serialized component at `path` as JSON text.
fn render_component(
    ctx: &Context,
    tree: &ComponentTree,
    path: Option<&str>,
    compact: bool,
) -> CliResult<String> {
    let id = resolve(ctx, tree, path)?;
    let component = tree
        .as_array(id)
        .map(Value::Object)
        .ok_or(ComponentError::StaleComponent)?;
    Ok(LayoutDocument::new(component).render(ctx.pretty(compact))?)
}

#[instrument(level = "debug", skip(ctx))]
fn cmd_edit(ctx: &Context, file: &Path, edit: &Edit, out: &OutputArgs) -> CliResult<()> {
    let (mut document, mut tree) = ctx.load(file)?;
    edit.apply(&mut tree, &ctx.separator)?;
    document.replace_root(&tree)?;

    let pretty = ctx.pretty(out.compact);
    if out.in_place {
        document.save(file, pretty)?;
        output::success(&format!("{}: {}", file.display(), edit));
    } else {
        output::info(&document.render(pretty)?);
    }
    Ok(())
}

fn cmd_config(ctx: &Context, command: &ConfigCommands, project_dir: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&ctx.settings.to_toml()?),
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(path) => output::detail(&format!("global: {}", path.display())),
                None => output::detail(&"global: <unavailable>"),
            }
            if let Some(dir) = project_dir {
                output::detail(&format!("local:  {}", local_config_path(dir).display()));
            }
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

/// Resolve an optional path from the root; no path means the root.
fn resolve(ctx: &Context, tree: &ComponentTree, path: Option<&str>) -> CliResult<ComponentId> {
    match path {
        None | Some("") => Ok(tree.root()),
        Some(path) => tree
            .get_nested_child(tree.root(), path, &ctx.separator)
            .ok_or_else(|| ComponentError::PathNotFound(path.to_string()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    fn context(args: &[&str]) -> Context {
        let cli = Cli::try_parse_from(args).unwrap();
        Context::new(&cli, Settings::default()).unwrap()
    }

    fn tree() -> ComponentTree {
        ComponentTree::from_attributes(
            "checkout",
            json!({"children": {"steps": {"displayArea": "steps", "sortOrder": "1"}}})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn given_compact_flag_when_rendering_component_then_single_line() {
        let ctx = context(&["jslayout", "get", "layout.json", "steps", "--compact"]);

        let text = render_component(&ctx, &tree(), Some("steps"), true).unwrap();

        assert_eq!(text, r#"{"displayArea":"steps","sortOrder":"1"}"#);
    }

    #[test]
    fn given_default_settings_when_rendering_component_then_pretty() {
        let ctx = context(&["jslayout", "get", "layout.json", "steps"]);

        let text = render_component(&ctx, &tree(), Some("steps"), false).unwrap();

        assert!(text.contains('\n'));
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["sortOrder"], "1");
    }

    #[test]
    fn given_unknown_path_when_rendering_component_then_path_not_found() {
        let ctx = context(&["jslayout", "get", "layout.json"]);

        let err = render_component(&ctx, &tree(), Some("sidebar"), false).unwrap_err();

        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }

    #[test]
    fn given_empty_separator_flag_when_building_context_then_invalid_args() {
        let cli = Cli::try_parse_from(["jslayout", "--separator", "", "paths", "layout.json"])
            .unwrap();

        let result = Context::new(&cli, Settings::default());

        assert!(matches!(result, Err(CliError::InvalidArgs(_))));
    }
}
