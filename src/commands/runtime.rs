use crate::catalog;
use crate::services::selection::{self, Selector};
use crate::services::transfer::{self, CopyPlan};
use crate::services::xsec::{self, XsecProgress};
use crate::services::{grid, storage};
use crate::*;

pub fn handle_runtime_commands(
    cli: &Cli,
    cfg: &Config,
    runner: &dyn CommandRunner,
) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Xsec(args) => run_xsec(cli, cfg, runner, args)?,
        Commands::List(args) => run_list(cli, cfg, runner, args)?,
        Commands::Copy(args) => run_copy(cli, cfg, runner, args)?,
        _ => return Ok(false),
    }
    Ok(true)
}

struct TerminalProgress {
    json: bool,
    debug: bool,
}

impl XsecProgress for TerminalProgress {
    fn command_started(&mut self, command: &str) {
        say(self.json, format!("Running command: {}", command));
    }

    fn parent_found(&mut self, parent: &str) {
        say(self.json, format!("Found parent dataset: {}", parent));
    }

    fn file_found(&mut self, file: &str) {
        say(self.json, format!("Found MiniAOD file: {}", file));
    }

    fn simulator_started(&mut self, command: &str) {
        tracing::info!(command, "starting cmsRun");
        say(self.json, "\nThis might take a few seconds ...");
    }

    fn simulator_output(&mut self, output: &str) {
        if !self.debug {
            return;
        }
        let dump = format!(
            "\n======== debugging: Full cmsRun output ========\n{}\n\n================================================\n",
            output
        );
        if self.json {
            eprintln!("{}", dump);
        } else {
            println!("{}", dump);
        }
    }
}

fn run_xsec(
    cli: &Cli,
    cfg: &Config,
    runner: &dyn CommandRunner,
    args: &XsecArgs,
) -> anyhow::Result<()> {
    let base = grid::cmssw_from_env()?;
    say(cli.json, format!("CMSSW environment detected: {}", base));
    let left = grid::proxy_time_left(runner)?;
    say(
        cli.json,
        format!("CMS VOMS proxy found. Time left: {}.", left),
    );

    let url = args
        .cfg_url
        .as_deref()
        .or(cfg.xsec_cfg_url.as_deref())
        .unwrap_or(xsec::DEFAULT_XSEC_CFG_URL);
    if storage::ensure_downloaded(&args.cfg, url)? {
        say(
            cli.json,
            format!("{} downloaded successfully.", args.cfg.display()),
        );
    }

    let redirector = args
        .redirector
        .as_deref()
        .or(cfg.xsec_redirector.as_deref())
        .unwrap_or(xsec::DEFAULT_XSEC_REDIRECTOR);

    let mut progress = TerminalProgress {
        json: cli.json,
        debug: cli.debug,
    };
    let mut reports = Vec::with_capacity(args.dataset.len());
    for dataset in &args.dataset {
        say(
            cli.json,
            format!("\n{}", paint(YELLOW, &format!("Processing: {}", dataset))),
        );
        let report = xsec::process_dataset(runner, dataset, &args.cfg, redirector, &mut progress);
        match (&report.error, &report.xsec) {
            (Some(err), _) => warn_line(cli.json, format!("Error: {}", err)),
            (None, Some(x)) => say(cli.json, format!("\n{}", paint(BRIGHT_YELLOW, x))),
            (None, None) => {}
        }
        reports.push(report);
    }

    let failed = reports.iter().filter(|r| r.status == "failed").count();
    if cli.json {
        print_json(failed == 0, &reports)?;
    } else {
        println!("\nDone!\n");
    }
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_list(
    cli: &Cli,
    cfg: &Config,
    runner: &dyn CommandRunner,
    args: &ListArgs,
) -> anyhow::Result<()> {
    let bounds = if args.no_size_limit {
        SizeBounds::from_mb(None, None)
    } else {
        SizeBounds::checked_mb(args.min, args.max)?
    };
    let datasets =
        storage::resolve_datasets(&args.datasets, args.datasets_file.as_deref(), cfg)?;

    if grid::ensure_proxy(runner)? {
        say(cli.json, "Proxy generated.");
    } else {
        say(cli.json, "Valid proxy already exists.");
    }

    say(cli.json, "Investigating samples ..");
    say(cli.json, selection::render_header());

    let mut selector = Selector::new(bounds, args.n);
    for dataset in &datasets {
        if args.n != Some(1) {
            say(cli.json, paint(YELLOW, catalog::short_name(dataset)));
        }
        match catalog::list_files(runner, dataset) {
            Ok(entries) => {
                tracing::debug!(dataset = %dataset, files = entries.len(), "catalog answered");
                for row in selector.add_dataset(dataset, &entries) {
                    say(cli.json, selection::render_row(row));
                }
            }
            Err(e) => {
                warn_line(cli.json, "  Error querying DAS. Skipping dataset.");
                tracing::warn!(error = %e, "catalog query failed");
                selector.skip_dataset(dataset, e.to_string());
            }
        }
    }
    let sel = selector.finish();

    say(
        cli.json,
        format!(
            "{}\n{}\n",
            selection::rule(),
            paint(BRIGHT_YELLOW, &selection::render_totals(&sel))
        ),
    );

    storage::write_text(&args.list_out, &selection::render_list(&sel))?;
    storage::write_text(&args.info_out, &selection::render_info(&sel))?;

    let failed = sel.datasets.iter().filter(|d| d.status == "failed").count();
    if cli.json {
        let report = ListReport {
            list_file: args.list_out.to_string_lossy().into_owned(),
            info_file: args.info_out.to_string_lossy().into_owned(),
            bounds,
            per_dataset: args.n,
            selection: sel,
        };
        print_json(failed == 0, report)?;
    }
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn run_copy(
    cli: &Cli,
    cfg: &Config,
    runner: &dyn CommandRunner,
    args: &CopyArgs,
) -> anyhow::Result<()> {
    let paths = transfer::parse_file_list(&storage::read_text(&args.list)?);
    let redirector = args
        .redirector
        .as_deref()
        .or(cfg.copy_redirector.as_deref())
        .unwrap_or(transfer::DEFAULT_COPY_REDIRECTOR);

    if !args.dry_run && !paths.is_empty() && grid::ensure_proxy(runner)? {
        say(cli.json, "Proxy generated.");
    }

    let plan = CopyPlan {
        dest: &args.dest,
        redirector,
        dry_run: args.dry_run,
        quiet: cli.json,
    };
    let report = transfer::copy_all(runner, &plan, &paths, &mut |command| {
        say(cli.json, command)
    });

    if cli.json {
        print_json(report.failed == 0, &report)?;
    } else if report.dry_run && report.failed == 0 {
        println!("Dry run: {} copies planned.", report.copied);
    } else if report.failed == 0 {
        println!("All files copied.");
    } else {
        for item in report.items.iter().filter(|i| i.status == "failed") {
            warn_line(
                false,
                format!("{}: {}", item.source, item.error.as_deref().unwrap_or("")),
            );
        }
        warn_line(
            false,
            format!("{} of {} files failed.", report.failed, report.items.len()),
        );
    }
    if report.failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
