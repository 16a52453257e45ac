use serde::{Deserialize, Serialize};

use crate::registry::{PosetId, Registry};
use crate::relation_store::PosetSnapshot;

/// One registry call, as read from a script line.
/// Element names may be absent or `null`; such calls fail.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Create,
    Destroy { id: PosetId },
    Size { id: PosetId },
    Clear { id: PosetId },
    Insert { id: PosetId, name: Option<String> },
    Remove { id: PosetId, name: Option<String> },
    Add { id: PosetId, v1: Option<String>, v2: Option<String> },
    Del { id: PosetId, v1: Option<String>, v2: Option<String> },
    Test { id: PosetId, v1: Option<String>, v2: Option<String> },
    Show { id: PosetId },
}

/// Result of one command, serialized as one JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Created { id: PosetId },
    Size { size: usize },
    Flag { ok: bool },
    Snapshot { id: PosetId, poset: Option<PosetSnapshot> },
    Done {},
}

pub fn execute(registry: &mut Registry, command: &Command) -> Reply {
    match command {
        Command::Create => Reply::Created { id: registry.create() },
        Command::Destroy { id } => {
            registry.destroy(*id);
            Reply::Done {}
        }
        Command::Size { id } => Reply::Size { size: registry.size(*id) },
        Command::Clear { id } => {
            registry.clear(*id);
            Reply::Done {}
        }
        Command::Insert { id, name } => Reply::Flag { ok: registry.insert(*id, name.as_deref()) },
        Command::Remove { id, name } => Reply::Flag { ok: registry.remove(*id, name.as_deref()) },
        Command::Add { id, v1, v2 } => Reply::Flag {
            ok: registry.add(*id, v1.as_deref(), v2.as_deref()),
        },
        Command::Del { id, v1, v2 } => Reply::Flag {
            ok: registry.del(*id, v1.as_deref(), v2.as_deref()),
        },
        Command::Test { id, v1, v2 } => Reply::Flag {
            ok: registry.test(*id, v1.as_deref(), v2.as_deref()),
        },
        Command::Show { id } => Reply::Snapshot {
            id: *id,
            poset: registry.get(*id).map(|p| p.snapshot()),
        },
    }
}

/// Parses a script: either one JSON array of commands or one command per line.
pub fn parse(input: &str) -> serde_json::Result<Vec<Command>> {
    let s = input.trim();
    if s.starts_with('[') {
        serde_json::from_str(s)
    } else {
        s.lines()
            .filter(|l| !l.trim().is_empty())
            .map(serde_json::from_str)
            .collect()
    }
}

pub fn run(registry: &mut Registry, commands: &[Command]) -> Vec<Reply> {
    commands.iter().map(|c| execute(registry, c)).collect()
}
