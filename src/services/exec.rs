use anyhow::Context;
use std::process::{Command, Stdio};

/// Captured result of one external process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Stdout followed by stderr. cmsRun reports its summary on stderr.
    pub fn combined(&self) -> String {
        let mut out = String::with_capacity(self.stdout.len() + self.stderr.len());
        out.push_str(&self.stdout);
        out.push_str(&self.stderr);
        out
    }
}

/// Seam over external process execution so pipelines can run against
/// scripted tools in tests.
pub trait CommandRunner {
    /// Runs to completion with stdout/stderr captured.
    fn capture(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput>;

    /// Runs to completion attached to the terminal. Returns whether it exited 0.
    fn status(&self, program: &str, args: &[String]) -> anyhow::Result<bool>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn capture(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput> {
        tracing::debug!(command = %render(program, args), "running");
        let out = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("failed to start {}", program))?;
        Ok(CommandOutput {
            success: out.status.success(),
            code: out.status.code(),
            stdout: String::from_utf8_lossy(&out.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&out.stderr).into_owned(),
        })
    }

    fn status(&self, program: &str, args: &[String]) -> anyhow::Result<bool> {
        tracing::debug!(command = %render(program, args), "running attached");
        let status = Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to start {}", program))?;
        Ok(status.success())
    }
}

/// Shell-like rendering of a command line for printing and logs.
pub fn render(program: &str, args: &[String]) -> String {
    let mut out = program.to_string();
    for a in args {
        out.push(' ');
        if a.is_empty() || a.contains(char::is_whitespace) || a.contains('|') {
            out.push('"');
            out.push_str(a);
            out.push('"');
        } else {
            out.push_str(a);
        }
    }
    out
}

#[cfg(test)]
pub mod fake {
    use super::{CommandOutput, CommandRunner};
    use std::cell::RefCell;

    /// Runner backed by a closure; records every call as `program arg...`.
    pub struct FnRunner<F>
    where
        F: Fn(&str, &[String]) -> anyhow::Result<CommandOutput>,
    {
        respond: F,
        pub calls: RefCell<Vec<Vec<String>>>,
    }

    impl<F> FnRunner<F>
    where
        F: Fn(&str, &[String]) -> anyhow::Result<CommandOutput>,
    {
        pub fn new(respond: F) -> Self {
            Self {
                respond,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, program: &str, args: &[String]) {
            let mut call = vec![program.to_string()];
            call.extend(args.iter().cloned());
            self.calls.borrow_mut().push(call);
        }
    }

    impl<F> CommandRunner for FnRunner<F>
    where
        F: Fn(&str, &[String]) -> anyhow::Result<CommandOutput>,
    {
        fn capture(&self, program: &str, args: &[String]) -> anyhow::Result<CommandOutput> {
            self.record(program, args);
            (self.respond)(program, args)
        }

        fn status(&self, program: &str, args: &[String]) -> anyhow::Result<bool> {
            self.record(program, args);
            Ok((self.respond)(program, args)?.success)
        }
    }

    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: &str) -> CommandOutput {
        CommandOutput {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{render, CommandOutput};

    #[test]
    fn render_quotes_arguments_with_spaces_and_pipes() {
        let args = vec![
            "-query".to_string(),
            "file dataset=/A/B/C | grep file.name".to_string(),
        ];
        assert_eq!(
            render("dasgoclient", &args),
            "dasgoclient -query \"file dataset=/A/B/C | grep file.name\""
        );
    }

    #[test]
    fn combined_output_keeps_stdout_first() {
        let out = CommandOutput {
            success: true,
            code: Some(0),
            stdout: "a\n".to_string(),
            stderr: "b\n".to_string(),
        };
        assert_eq!(out.combined(), "a\nb\n");
    }
}
