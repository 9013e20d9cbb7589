use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while defining or removing genes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneError {
    /// The allele arguments do not describe a usable gene.
    #[error("Invalid gene definition: {0}")]
    InvalidGene(String),

    /// A gene with this symbol is already registered.
    #[error("Gene '{0}' is already defined")]
    DuplicateGene(char),

    /// No gene is registered under this symbol.
    #[error("Gene '{0}' is not defined")]
    UnknownGene(char),

    /// The gene is still carried by organisms of a group.
    #[error("Gene '{symbol}' is still used by group '{group}'")]
    GeneInUse { symbol: char, group: String },
}

/// Errors produced by genotype validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenotypeError {
    /// Odd (or zero) number of allele characters.
    #[error("Malformed genotype '{0}': length must be a positive even number")]
    MalformedGenotype(String),

    /// A locus starts with a character naming no registered gene.
    #[error("Gene '{0}' is not defined")]
    UnknownGene(char),

    /// A locus contains a character outside its gene's allele pair.
    #[error("Invalid allele combination '{locus}' for gene '{symbol}'")]
    InvalidAllele { locus: String, symbol: char },

    /// A heterozygous locus is written recessive first.
    #[error("Dominant allele must come first: expected '{expected}', got '{locus}'")]
    BadAlleleOrder { locus: String, expected: String },
}

/// Errors raised by population operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopulationError {
    #[error(transparent)]
    Genotype(#[from] GenotypeError),

    /// The same gene occupies more than one locus of a structure genotype.
    #[error("Gene '{0}' appears at more than one locus")]
    RepeatedLocus(char),

    /// Genotype length differs from the population's locked length.
    #[error("Genotype length mismatch: expected {expected}, got {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Genotype loci name different genes, or the same genes in a different
    /// order, than the population's locked structure.
    #[error("Locus structure mismatch: expected genes {expected}, got {found}")]
    StructureMismatch { expected: String, found: String },

    /// Adding organisms would exceed the population size limit.
    #[error("Cannot add {requested} organism(s) to a population of {current}: limit is {limit}")]
    PopulationTooLarge {
        requested: usize,
        current: usize,
        limit: usize,
    },

    /// Mating mode is neither `random` nor `cross`.
    #[error("Invalid mode '{0}': expected 'random' or 'cross'")]
    InvalidMode(String),

    /// Breeding needs at least two parents.
    #[error("At least two organisms are required for breeding, found {0}")]
    InsufficientPopulation(usize),

    /// Not enough copies of a genotype to remove.
    #[error("Cannot remove {requested} x '{genotype}': only {available} present")]
    InsufficientQuantity {
        genotype: String,
        requested: usize,
        available: usize,
    },
}

/// Errors surfaced by the command processor.
///
/// Every variant is recoverable: `Session::process` renders it as text and
/// the session continues.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Gene(#[from] GeneError),

    #[error(transparent)]
    Genotype(#[from] GenotypeError),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error("Unknown instruction '{0}', type /help for the command list")]
    UnknownInstruction(String),

    #[error("Group '{0}' does not exist")]
    UnknownGroup(String),

    #[error("Group '{0}' already exists")]
    GroupExists(String),

    #[error("No current group, specify a group name")]
    NoCurrentGroup,

    #[error("Wrong number of arguments for {command}, usage: {usage}")]
    BadArgumentCount {
        command: &'static str,
        usage: &'static str,
    },

    #[error("Invalid value '{value}' for {argument}")]
    BadArgumentType {
        argument: &'static str,
        value: String,
    },

    #[error("Operation must be 'add' or 'del', got '{0}'")]
    InvalidOperation(String),

    #[error("Genotype length must be a positive even number, got {0}")]
    InvalidLength(usize),

    #[error("No genes defined, use /add first")]
    NoGenesDefined,

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("File {} is not valid UTF-8", .0.display())]
    DecodeError(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Batch files nested deeper than {0} levels")]
    LoadDepthExceeded(usize),

    #[error("Repetition aborted after {completed} completed run(s): {source}")]
    RepeatAborted {
        completed: usize,
        #[source]
        source: Box<CommandError>,
    },
}

/// Errors loading a session configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_population_error_wraps_genotype_error() {
        let err: PopulationError = GenotypeError::UnknownGene('B').into();
        assert_eq!(err.to_string(), "Gene 'B' is not defined");
    }

    #[test]
    fn test_repeat_aborted_message_includes_cause() {
        let err = CommandError::RepeatAborted {
            completed: 2,
            source: Box::new(CommandError::NoCurrentGroup),
        };
        let msg = err.to_string();
        assert!(msg.contains("after 2 completed"));
        assert!(msg.contains("No current group"));
    }
}
