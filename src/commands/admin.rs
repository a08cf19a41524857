use crate::services::grid;
use crate::*;

pub fn handle_admin_commands(cli: &Cli, runner: &dyn CommandRunner) -> anyhow::Result<bool> {
    let Commands::Doctor = &cli.command else {
        return Ok(false);
    };

    let report = grid::doctor(runner);
    if cli.json {
        print_json(report.overall == "ok", &report)?;
    } else {
        print_out(false, &report.checks, |c| {
            format!(
                "{}\t{}\t{}",
                c.name,
                c.status,
                c.detail.as_deref().unwrap_or("")
            )
        })?;
        println!("overall: {}", report.overall);
    }
    if report.overall != "ok" {
        std::process::exit(1);
    }

    Ok(true)
}
