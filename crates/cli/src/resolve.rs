use std::path::PathBuf;

use engine::{FileArgs, Options, RemoteSyntax, Role};

use crate::args::Args;
use crate::error::{CliError, Result};

/// One parsed source/destination operand: either a plain local path, or a
/// `host:path` / `host::module/path` / `rsync://host/module/path` remote
/// reference.
#[derive(Debug, Clone, Eq, PartialEq)]
enum Operand {
    Local(PathBuf),
    Remote {
        host: String,
        path: PathBuf,
        syntax: RemoteSyntax,
        module: Option<String>,
    },
}

/// Splits a single positional operand into its local or remote form.
/// Mirrors upstream `rsync`'s three remote spellings: `rsync://`,
/// `host::module/path`, and plain-shell `host:path` (the last only when the
/// colon is not part of a Windows drive letter, which this core does not
/// attempt to disambiguate since it targets Unix-style paths).
fn parse_operand(raw: &str) -> Operand {
    if let Some(rest) = raw.strip_prefix("rsync://") {
        let (host_and_module, path) = rest.split_once('/').unwrap_or((rest, ""));
        let (host, module) = host_and_module
            .split_once('/')
            .unwrap_or((host_and_module, ""));
        return Operand::Remote {
            host: host.to_string(),
            path: PathBuf::from(path),
            syntax: RemoteSyntax::Url,
            module: (!module.is_empty()).then(|| module.to_string()),
        };
    }
    if let Some((host, rest)) = raw.split_once("::") {
        let (module, path) = rest.split_once('/').unwrap_or((rest, ""));
        return Operand::Remote {
            host: host.to_string(),
            path: PathBuf::from(path),
            syntax: RemoteSyntax::DoubleColon,
            module: Some(module.to_string()),
        };
    }
    if let Some((host, path)) = raw.split_once(':') {
        return Operand::Remote {
            host: host.to_string(),
            path: PathBuf::from(path),
            syntax: RemoteSyntax::RemoteShell,
            module: None,
        };
    }
    Operand::Local(PathBuf::from(raw))
}

/// Resolves a parsed [`Args`] into the `(Options, FileArgs)` pair the
/// session driver consumes. `--server`/`--sender` select [`Role::Sender`] or
/// [`Role::Receiver`] directly, matching how a spawned remote peer is told
/// which side of the exchange to play; otherwise the role follows from
/// whether either operand names a remote host.
pub fn resolve(args: &Args) -> Result<(Options, FileArgs)> {
    let opts = Options {
        sender: args.sender,
        server: args.server,
        recursive: args.recursive,
        verbose: args.verbose,
        dry_run: args.dry_run,
        preserve_times: args.times,
        preserve_perms: args.perms,
        preserve_links: args.links,
        delete: args.delete,
        rsync_path: args.rsync_path.clone(),
    };

    if args.server {
        let role = if args.sender {
            Role::Sender
        } else {
            Role::Receiver
        };
        let sources = args.paths.iter().map(PathBuf::from).collect::<Vec<_>>();
        let sink = sources.last().cloned().unwrap_or_default();
        return Ok((
            opts,
            FileArgs {
                host: None,
                sources,
                sink,
                role,
                remote_syntax: None,
                module: None,
            },
        ));
    }

    if args.paths.len() < 2 {
        return Err(CliError::MissingOperands);
    }
    let (dest_raw, source_raws) = args.paths.split_last().expect("len checked above");
    let sources: Vec<Operand> = source_raws.iter().map(|s| parse_operand(s.as_str())).collect();
    let dest = parse_operand(dest_raw);

    let remote_count = sources.iter().filter(|o| matches!(o, Operand::Remote { .. })).count()
        + usize::from(matches!(dest, Operand::Remote { .. }));
    if remote_count > 1 {
        return Err(CliError::MultipleRemotes);
    }

    if let Operand::Remote {
        host,
        path,
        syntax,
        module,
    } = &dest
    {
        let local_sources = sources
            .into_iter()
            .map(|o| match o {
                Operand::Local(p) => Ok(p),
                Operand::Remote { .. } => Err(CliError::MultipleRemotes),
            })
            .collect::<Result<Vec<_>>>()?;
        return Ok((
            opts,
            FileArgs {
                host: Some(host.clone()),
                sources: local_sources,
                sink: path.clone(),
                role: Role::Sender,
                remote_syntax: Some(syntax.clone()),
                module: module.clone(),
            },
        ));
    }

    let dest_path = match dest {
        Operand::Local(p) => p,
        Operand::Remote { .. } => unreachable!("handled above"),
    };

    if let Some(Operand::Remote {
        host,
        path,
        syntax,
        module,
    }) = sources.first()
    {
        if sources.len() != 1 {
            return Err(CliError::MultipleRemotes);
        }
        return Ok((
            opts,
            FileArgs {
                host: Some(host.clone()),
                sources: vec![path.clone()],
                sink: dest_path,
                role: Role::Receiver,
                remote_syntax: Some(syntax.clone()),
                module: module.clone(),
            },
        ));
    }

    let local_sources = sources
        .into_iter()
        .map(|o| match o {
            Operand::Local(p) => p,
            Operand::Remote { .. } => unreachable!("checked above"),
        })
        .collect();
    Ok((opts, FileArgs::local(local_sources, dest_path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("rsync27").chain(argv.iter().copied()))
    }

    #[test]
    fn local_transfer_resolves_to_role_local() {
        let args = parse(&["-r", "-v", "-v", "src", "dst"]);
        let (opts, fileargs) = resolve(&args).unwrap();
        assert!(opts.recursive);
        assert_eq!(opts.verbose, 2);
        assert_eq!(fileargs.role, Role::Local);
        assert_eq!(fileargs.sources, vec![PathBuf::from("src")]);
        assert_eq!(fileargs.sink, PathBuf::from("dst"));
    }

    #[test]
    fn remote_shell_destination_selects_sender_role() {
        let args = parse(&["src", "host:dest"]);
        let (_opts, fileargs) = resolve(&args).unwrap();
        assert_eq!(fileargs.role, Role::Sender);
        assert_eq!(fileargs.host.as_deref(), Some("host"));
        assert_eq!(fileargs.sink, PathBuf::from("dest"));
        assert_eq!(fileargs.remote_syntax, Some(RemoteSyntax::RemoteShell));
    }

    #[test]
    fn remote_shell_source_selects_receiver_role() {
        let args = parse(&["host:src", "dest"]);
        let (_opts, fileargs) = resolve(&args).unwrap();
        assert_eq!(fileargs.role, Role::Receiver);
        assert_eq!(fileargs.host.as_deref(), Some("host"));
        assert_eq!(fileargs.sources, vec![PathBuf::from("src")]);
    }

    #[test]
    fn server_sender_mode_bypasses_operand_parsing() {
        let args = parse(&["--server", "--sender", "."]);
        let (_opts, fileargs) = resolve(&args).unwrap();
        assert_eq!(fileargs.role, Role::Sender);
    }

    #[test]
    fn too_few_operands_is_an_error() {
        let args = parse(&["only-one"]);
        assert!(matches!(resolve(&args), Err(CliError::MissingOperands)));
    }

    #[test]
    fn two_remote_operands_is_rejected() {
        let args = parse(&["host1:src", "host2:dst"]);
        assert!(matches!(resolve(&args), Err(CliError::MultipleRemotes)));
    }
}
