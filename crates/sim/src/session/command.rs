//! Textual command protocol.
//!
//! One command per line: a case-insensitive keyword followed by
//! whitespace-separated arguments. Parsing produces a typed [`Command`];
//! execution lives in [`Session`](crate::session::Session).

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::CommandError;
use crate::simulation::MatingMode;

/// Composition change requested by `/change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOp {
    Add,
    Del,
}

impl FromStr for ChangeOp {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "del" => Ok(Self::Del),
            other => Err(CommandError::InvalidOperation(other.to_string())),
        }
    }
}

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    AddGene {
        dominant: String,
        recessive: String,
        dominant_trait: String,
        recessive_trait: String,
    },
    DeleteGene {
        symbol: char,
    },
    Create {
        group: String,
    },
    Read {
        group: String,
    },
    Save {
        group: String,
    },
    List {
        group: Option<String>,
    },
    Show {
        group: String,
        details: bool,
    },
    Run {
        group: Option<String>,
    },
    Write {
        group: Option<String>,
    },
    Change {
        group: String,
        genotype: String,
        op: ChangeOp,
        amount: usize,
    },
    Random {
        group: String,
        amount: usize,
        length: usize,
    },
    Load {
        path: PathBuf,
    },
    Mode {
        group: String,
        mode: MatingMode,
    },
    Runs {
        count: usize,
        group: Option<String>,
    },
    Exit,
}

pub const ADD_USAGE: &str = "/add <dominant> <recessive> <dominant trait> <recessive trait>";
pub const DELETE_USAGE: &str = "/delete <symbol>";
pub const CREATE_USAGE: &str = "/create <group>";
pub const READ_USAGE: &str = "/read <group>";
pub const SAVE_USAGE: &str = "/save <group>";
pub const SHOW_USAGE: &str = "/show <group> [-details]";
pub const CHANGE_USAGE: &str = "/change <group> <genotype> <add|del> <amount>";
pub const RANDOM_USAGE: &str = "/random <group> <amount> <length>";
pub const LOAD_USAGE: &str = "/load <file>";
pub const MODE_USAGE: &str = "/mode <group> <random|cross>";
pub const RUNS_USAGE: &str = "/runs <count> [group]";

pub const HELP_TEXT: &str = "\
=== Mendel command reference ===
/help                                          show this help
/add <dom> <rec> <dom trait> <rec trait>       define a gene
/delete <symbol>                               remove a gene no group uses
/create <group>                                create a group and make it current
/read <group>                                  switch the current group
/save <group>                                  copy the current group into <group>
/list [group]                                  list groups, or members of a group
/show <group> [-details]                       genotype and phenotype statistics
/run [group]                                   breed one generation
/write [group]                                 breed one generation and confirm
/change <group> <genotype> <add|del> <amount>  change group composition
/random <group> <amount> <length>              add random organisms
/load <file>                                   run commands from a UTF-8 file
/mode <group> <random|cross>                   set the mating mode
/runs <count> [group]                          breed <count> generations
/exit                                          leave the session

Genotypes list one locus per gene, dominant allele first (e.g. AaBb).
Breeding needs at least two organisms and replaces the parents with the
offspring; alleles segregate independently at every locus.";

impl Command {
    /// Parse one line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = tokens.collect();
        let keyword = keyword.to_lowercase();

        let command = match keyword.as_str() {
            "/help" => Self::Help,
            "/add" => {
                let &[dominant, recessive, dominant_trait, recessive_trait] = args.as_slice() else {
                    return Err(arg_count("/add", ADD_USAGE));
                };
                Self::AddGene {
                    dominant: dominant.to_string(),
                    recessive: recessive.to_string(),
                    dominant_trait: dominant_trait.to_string(),
                    recessive_trait: recessive_trait.to_string(),
                }
            }
            "/delete" => {
                let raw = required(&args, 0, "/delete", DELETE_USAGE)?;
                let mut chars = raw.chars();
                let symbol = match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => return Err(bad_value("symbol", raw)),
                };
                Self::DeleteGene { symbol }
            }
            "/create" => Self::Create {
                group: required(&args, 0, "/create", CREATE_USAGE)?.to_string(),
            },
            "/read" => Self::Read {
                group: required(&args, 0, "/read", READ_USAGE)?.to_string(),
            },
            "/save" => Self::Save {
                group: required(&args, 0, "/save", SAVE_USAGE)?.to_string(),
            },
            "/list" => Self::List {
                group: args.first().map(|s| s.to_string()),
            },
            "/show" => Self::Show {
                group: required(&args, 0, "/show", SHOW_USAGE)?.to_string(),
                details: args[1..].contains(&"-details"),
            },
            "/run" => Self::Run {
                group: args.first().map(|s| s.to_string()),
            },
            "/write" => Self::Write {
                group: args.first().map(|s| s.to_string()),
            },
            "/change" => {
                if args.len() < 4 {
                    return Err(arg_count("/change", CHANGE_USAGE));
                }
                Self::Change {
                    group: args[0].to_string(),
                    genotype: args[1].to_string(),
                    op: args[2].parse()?,
                    amount: parse_count("amount", args[3])?,
                }
            }
            "/random" => {
                if args.len() < 3 {
                    return Err(arg_count("/random", RANDOM_USAGE));
                }
                Self::Random {
                    group: args[0].to_string(),
                    amount: parse_count("amount", args[1])?,
                    length: parse_count("length", args[2])?,
                }
            }
            "/load" => Self::Load {
                path: PathBuf::from(required(&args, 0, "/load", LOAD_USAGE)?),
            },
            "/mode" => {
                if args.len() < 2 {
                    return Err(arg_count("/mode", MODE_USAGE));
                }
                Self::Mode {
                    group: args[0].to_string(),
                    mode: args[1].parse()?,
                }
            }
            "/runs" => Self::Runs {
                count: parse_count("count", required(&args, 0, "/runs", RUNS_USAGE)?)?,
                group: args.get(1).map(|s| s.to_string()),
            },
            "/exit" => Self::Exit,
            _ => return Err(CommandError::UnknownInstruction(keyword)),
        };
        Ok(Some(command))
    }

    /// Protocol keyword of this command.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Help => "/help",
            Self::AddGene { .. } => "/add",
            Self::DeleteGene { .. } => "/delete",
            Self::Create { .. } => "/create",
            Self::Read { .. } => "/read",
            Self::Save { .. } => "/save",
            Self::List { .. } => "/list",
            Self::Show { .. } => "/show",
            Self::Run { .. } => "/run",
            Self::Write { .. } => "/write",
            Self::Change { .. } => "/change",
            Self::Random { .. } => "/random",
            Self::Load { .. } => "/load",
            Self::Mode { .. } => "/mode",
            Self::Runs { .. } => "/runs",
            Self::Exit => "/exit",
        }
    }
}

fn required<'a>(
    args: &[&'a str],
    index: usize,
    command: &'static str,
    usage: &'static str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| arg_count(command, usage))
}

fn arg_count(command: &'static str, usage: &'static str) -> CommandError {
    CommandError::BadArgumentCount { command, usage }
}

fn bad_value(argument: &'static str, value: &str) -> CommandError {
    CommandError::BadArgumentType {
        argument,
        value: value.to_string(),
    }
}

fn parse_count(argument: &'static str, value: &str) -> Result<usize, CommandError> {
    value.parse().map_err(|_| bad_value(argument, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PopulationError;

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("   \t ").unwrap(), None);
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert_eq!(Command::parse("/HELP").unwrap(), Some(Command::Help));
        assert_eq!(
            Command::parse("  /Create  G1 ").unwrap(),
            Some(Command::Create { group: "G1".into() })
        );
    }

    #[test]
    fn test_add_requires_exactly_four() {
        assert_eq!(
            Command::parse("/add A a 高茎 矮茎").unwrap(),
            Some(Command::AddGene {
                dominant: "A".into(),
                recessive: "a".into(),
                dominant_trait: "高茎".into(),
                recessive_trait: "矮茎".into(),
            })
        );
        assert!(matches!(
            Command::parse("/add A a tall"),
            Err(CommandError::BadArgumentCount { command: "/add", .. })
        ));
        assert!(matches!(
            Command::parse("/add A a tall short extra"),
            Err(CommandError::BadArgumentCount { .. })
        ));
    }

    #[test]
    fn test_show_details_flag() {
        assert_eq!(
            Command::parse("/show G -details").unwrap(),
            Some(Command::Show {
                group: "G".into(),
                details: true
            })
        );
        assert_eq!(
            Command::parse("/show G").unwrap(),
            Some(Command::Show {
                group: "G".into(),
                details: false
            })
        );
    }

    #[test]
    fn test_change() {
        assert_eq!(
            Command::parse("/change G Aa del 3").unwrap(),
            Some(Command::Change {
                group: "G".into(),
                genotype: "Aa".into(),
                op: ChangeOp::Del,
                amount: 3,
            })
        );
        assert!(matches!(
            Command::parse("/change G Aa swap 3"),
            Err(CommandError::InvalidOperation(op)) if op == "swap"
        ));
        assert!(matches!(
            Command::parse("/change G Aa add many"),
            Err(CommandError::BadArgumentType { argument: "amount", .. })
        ));
    }

    #[test]
    fn test_mode_and_runs() {
        assert_eq!(
            Command::parse("/mode G cross").unwrap(),
            Some(Command::Mode {
                group: "G".into(),
                mode: MatingMode::Cross
            })
        );
        assert!(matches!(
            Command::parse("/mode G selfing"),
            Err(CommandError::Population(PopulationError::InvalidMode(_)))
        ));
        assert_eq!(
            Command::parse("/runs 5").unwrap(),
            Some(Command::Runs {
                count: 5,
                group: None
            })
        );
        assert!(matches!(
            Command::parse("/runs -1"),
            Err(CommandError::BadArgumentType { argument: "count", .. })
        ));
    }

    #[test]
    fn test_run_defaults_to_current() {
        assert_eq!(
            Command::parse("/run").unwrap(),
            Some(Command::Run { group: None })
        );
        assert_eq!(
            Command::parse("/write G").unwrap(),
            Some(Command::Write {
                group: Some("G".into())
            })
        );
    }

    #[test]
    fn test_delete_symbol() {
        assert_eq!(
            Command::parse("/delete a").unwrap(),
            Some(Command::DeleteGene { symbol: 'a' })
        );
        assert!(matches!(
            Command::parse("/delete Ab"),
            Err(CommandError::BadArgumentType { argument: "symbol", .. })
        ));
    }

    #[test]
    fn test_unknown_instruction() {
        assert!(matches!(
            Command::parse("/fly away"),
            Err(CommandError::UnknownInstruction(k)) if k == "/fly"
        ));
    }

    #[test]
    fn test_keyword_roundtrip() {
        for line in ["/help", "/list", "/run", "/exit", "/load f.txt", "/read G"] {
            let command = Command::parse(line).unwrap().unwrap();
            assert_eq!(command.keyword(), line.split_whitespace().next().unwrap());
        }
    }
}
