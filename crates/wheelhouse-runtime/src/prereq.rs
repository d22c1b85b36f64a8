use serde::Serialize;
use std::fmt;
use std::process::Command;

/// A missing prerequisite with actionable install instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPrereq {
    pub name: &'static str,
    pub purpose: &'static str,
    pub install_hint: &'static str,
}

impl fmt::Display for MissingPrereq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  - {}: {} (install: {})",
            self.name, self.purpose, self.install_hint
        )
    }
}

const KNOWN_TOOLS: &[MissingPrereq] = &[
    MissingPrereq {
        name: "reprotest",
        purpose: "building packages repeatedly under varied environments",
        install_hint: "apt install reprotest",
    },
    MissingPrereq {
        name: "dpkg-deb",
        purpose: "extracting .deb control files",
        install_hint: "apt install dpkg",
    },
    MissingPrereq {
        name: "git",
        purpose: "cloning sources and checking the working tree",
        install_hint: "apt install git",
    },
    MissingPrereq {
        name: "make",
        purpose: "running package build targets",
        install_hint: "apt install make",
    },
];

fn command_exists(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn describe(tool: &str) -> Option<&'static MissingPrereq> {
    KNOWN_TOOLS.iter().find(|p| p.name == tool)
}

/// Which of `tools` are not on `PATH`. Unknown tool names are ignored.
pub fn check_prereqs(tools: &[&str]) -> Vec<MissingPrereq> {
    tools
        .iter()
        .filter_map(|tool| describe(tool))
        .filter(|p| !command_exists(p.name))
        .cloned()
        .collect()
}

/// Format a list of missing prerequisites into a user-friendly error message.
pub fn format_missing(missing: &[MissingPrereq]) -> String {
    use std::fmt::Write as _;
    let mut msg = String::from("missing prerequisites:\n");
    for m in missing {
        let _ = writeln!(msg, "{m}");
    }
    msg.push_str("\nInstall them and re-run the check.");
    msg
}
