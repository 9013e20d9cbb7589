//! The command processor.
//!
//! A `Session` owns the gene registry, every named population and the
//! random generator. Commands are dispatched by exhaustive matching on
//! [`Command`]; every error is turned into a [`Reply::Failed`] so a bad
//! command never ends the session.

use core::fmt;
use std::path::Path;

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::base::{upper, Gene, GeneRegistry, Locus};
use crate::errors::{CommandError, GeneError};
use crate::genome::Genotype;
use crate::session::batch::{self, BatchReport, MAX_LOAD_DEPTH};
use crate::session::command::{ChangeOp, Command, HELP_TEXT};
use crate::session::{report, SessionConfig};
use crate::simulation::{BreedRecord, MatingMode, Population, Statistics};

/// What a processed line produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Blank input, nothing to print
    Empty,
    Output(String),
    /// The command failed; the message is user-facing
    Failed(String),
    /// `/exit` was requested
    Exit,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty | Self::Exit => Ok(()),
            Self::Output(text) => f.write_str(text),
            Self::Failed(message) => write!(f, "Error: {message}"),
        }
    }
}

/// Gene registry, named populations and the current-group pointer.
#[derive(Debug)]
pub struct Session {
    genes: GeneRegistry,
    /// Populations in creation order
    groups: Vec<Population>,
    /// Name of the default group for `/run`, resolved on every use
    current: Option<String>,
    config: SessionConfig,
    rng: Xoshiro256PlusPlus,
    load_depth: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let rng = config.make_rng();
        Self::with_rng(config, rng)
    }

    /// Create a session driven by an explicit generator.
    pub fn with_rng(config: SessionConfig, rng: Xoshiro256PlusPlus) -> Self {
        Self {
            genes: GeneRegistry::new(),
            groups: Vec::new(),
            current: None,
            config,
            rng,
            load_depth: 0,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn genes(&self) -> &GeneRegistry {
        &self.genes
    }

    pub fn groups(&self) -> &[Population] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&Population> {
        self.groups.iter().find(|g| g.id() == name)
    }

    pub fn current_group(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Parse and execute one line.
    pub fn process(&mut self, line: &str) -> Reply {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Reply::Empty,
            Err(e) => return Reply::Failed(e.to_string()),
        };
        log::debug!("executing {}", command.keyword());
        match self.execute(command) {
            Ok(reply) => reply,
            Err(e) => {
                log::debug!("command failed: {e}");
                Reply::Failed(e.to_string())
            }
        }
    }

    /// Execute a parsed command, rendering its result as text.
    pub fn execute(&mut self, command: Command) -> Result<Reply, CommandError> {
        let text = match command {
            Command::Help => HELP_TEXT.to_string(),
            Command::AddGene {
                dominant,
                recessive,
                dominant_trait,
                recessive_trait,
            } => {
                let symbol = self.define_gene(&dominant, &recessive, &dominant_trait, &recessive_trait)?;
                let gene = self.genes.get(symbol).ok_or(GeneError::UnknownGene(symbol))?;
                report::gene_added(gene)
            }
            Command::DeleteGene { symbol } => report::gene_deleted(&self.delete_gene(symbol)?),
            Command::Create { group } => {
                self.create_group(&group)?;
                format!("Group {group} created")
            }
            Command::Read { group } => {
                self.read_group(&group)?;
                format!("Switched to group {group}")
            }
            Command::Save { group } => {
                let source = self.save_group(&group)?;
                format!("Saved group {source} as {group}")
            }
            Command::List { group: None } => {
                report::group_list(&self.groups, self.current.as_deref())
            }
            Command::List { group: Some(name) } => report::member_list(self.find(&name)?),
            Command::Show { group, details } => {
                let stats = self.statistics(&group, details)?;
                report::statistics(&group, &stats, details)
            }
            Command::Run { group } => self.run_and_report(group.as_deref())?,
            Command::Write { group } => {
                let mut text = self.run_and_report(group.as_deref())?;
                text.push_str("\nGroup state updated");
                text
            }
            Command::Change {
                group,
                genotype,
                op,
                amount,
            } => {
                self.change_composition(&group, &genotype, op, amount)?;
                match op {
                    ChangeOp::Add => format!("Added {amount} x {genotype} to {group}"),
                    ChangeOp::Del => format!("Removed {amount} x {genotype} from {group}"),
                }
            }
            Command::Random {
                group,
                amount,
                length,
            } => {
                self.random_generate(&group, amount, length)?;
                format!("Generated {amount} random organism(s) in {group}")
            }
            Command::Load { path } => self.load_commands(&path)?.render(),
            Command::Mode { group, mode } => {
                self.set_mode(&group, mode)?;
                format!("Group {group} set to {mode} mode")
            }
            Command::Runs { count, group } => {
                let records = self.run_for_times(count, group.as_deref())?;
                let name = self.resolve(group.as_deref())?;
                let stats = self.statistics(&name, false)?;
                report::repeated(&name, &records, &stats)
            }
            Command::Exit => return Ok(Reply::Exit),
        };
        Ok(Reply::Output(text))
    }

    /// Register a gene and return its symbol.
    pub fn define_gene(
        &mut self,
        dominant: &str,
        recessive: &str,
        dominant_trait: &str,
        recessive_trait: &str,
    ) -> Result<char, CommandError> {
        Ok(self
            .genes
            .define(dominant, recessive, dominant_trait, recessive_trait)?)
    }

    /// Remove a gene that no organism carries.
    pub fn delete_gene(&mut self, symbol: char) -> Result<Gene, CommandError> {
        let symbol = upper(symbol).unwrap_or(symbol);
        if self.genes.get(symbol).is_none() {
            return Err(GeneError::UnknownGene(symbol).into());
        }
        if let Some(pop) = self.groups.iter().find(|g| g.carries(symbol)) {
            return Err(GeneError::GeneInUse {
                symbol,
                group: pop.id().to_string(),
            }
            .into());
        }
        Ok(self.genes.remove(symbol)?)
    }

    /// Create an empty group and make it current.
    pub fn create_group(&mut self, name: &str) -> Result<(), CommandError> {
        if self.group(name).is_some() {
            return Err(CommandError::GroupExists(name.to_string()));
        }
        self.groups.push(Population::new(name));
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Make an existing group current.
    pub fn read_group(&mut self, name: &str) -> Result<(), CommandError> {
        self.find(name)?;
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Snapshot the current group into `target`, creating or overwriting it.
    ///
    /// Returns the name of the group that was copied. The current pointer is
    /// not moved.
    pub fn save_group(&mut self, target: &str) -> Result<String, CommandError> {
        let source = self.current.clone().ok_or(CommandError::NoCurrentGroup)?;
        let snapshot = self.find(&source)?.renamed(target);
        match self.index_of(target) {
            Ok(idx) => self.groups[idx] = snapshot,
            Err(_) => self.groups.push(snapshot),
        }
        Ok(source)
    }

    pub fn set_mode(&mut self, group: &str, mode: MatingMode) -> Result<(), CommandError> {
        let idx = self.index_of(group)?;
        self.groups[idx].set_mode(mode);
        Ok(())
    }

    pub fn statistics(&self, group: &str, details: bool) -> Result<Statistics, CommandError> {
        Ok(self.find(group)?.statistics(&self.genes, details)?)
    }

    /// Add or remove `amount` copies of a genotype.
    ///
    /// The genotype is validated and, for a non-empty group, checked against
    /// the locked length and locus order before either operation.
    pub fn change_composition(
        &mut self,
        group: &str,
        genotype: &str,
        op: ChangeOp,
        amount: usize,
    ) -> Result<(), CommandError> {
        let idx = self.index_of(group)?;
        let genotype = Genotype::parse(genotype, &self.genes)?;
        let pop = &mut self.groups[idx];
        pop.check_compatible(&genotype)?;
        match op {
            ChangeOp::Add => pop.add_copies(&genotype, amount)?,
            ChangeOp::Del => pop.remove_copies(&genotype, amount)?,
        }
        Ok(())
    }

    /// Add `amount` random organisms with `length`-character genotypes.
    ///
    /// Each locus draws both alleles independently with equal probability.
    /// Loci follow the group's locked structure when it has one; otherwise
    /// each locus picks a gene uniformly from the registry and the first
    /// organism locks the structure. Organisms added before a failure stay in
    /// the group.
    pub fn random_generate(
        &mut self,
        group: &str,
        amount: usize,
        length: usize,
    ) -> Result<(), CommandError> {
        let idx = self.index_of(group)?;
        if length == 0 || length % 2 != 0 {
            return Err(CommandError::InvalidLength(length));
        }
        if self.genes.is_empty() {
            return Err(CommandError::NoGenesDefined);
        }

        self.groups[idx].check_capacity(amount)?;

        let genes: Vec<&Gene> = self.genes.iter().collect();
        for _ in 0..amount {
            let locked = self.groups[idx].structure();
            let mut text = String::with_capacity(length);
            for locus in 0..length / 2 {
                let gene = match locked.get(locus).and_then(|&s| self.genes.get(s)) {
                    Some(gene) => gene,
                    None => genes[self.rng.random_range(0..genes.len())],
                };
                let first = random_allele(gene, &mut self.rng);
                let second = random_allele(gene, &mut self.rng);
                Locus::new(first, second).canonical(gene).push_to(&mut text);
            }
            self.groups[idx].add_organism(&text, &self.genes)?;
        }
        Ok(())
    }

    /// Breed one generation of `group` (or of the current group).
    pub fn run_generation(&mut self, group: Option<&str>) -> Result<(String, BreedRecord), CommandError> {
        let name = self.resolve(group)?;
        let idx = self.index_of(&name)?;
        let record = self.groups[idx].breed(&self.genes, &mut self.rng)?;
        Ok((name, record))
    }

    /// Breed `count` generations in a row.
    ///
    /// Unlike batch loading, the first failure stops the remaining
    /// repetitions.
    pub fn run_for_times(
        &mut self,
        count: usize,
        group: Option<&str>,
    ) -> Result<Vec<BreedRecord>, CommandError> {
        let mut records = Vec::new();
        for completed in 0..count {
            match self.run_generation(group) {
                Ok((_, record)) => records.push(record),
                Err(e) => {
                    return Err(CommandError::RepeatAborted {
                        completed,
                        source: Box::new(e),
                    })
                }
            }
        }
        Ok(records)
    }

    /// Execute every command line of a UTF-8 file.
    ///
    /// Blank and comment lines are skipped; failing lines are reported and
    /// do not stop the batch.
    pub fn load_commands(&mut self, path: &Path) -> Result<BatchReport, CommandError> {
        if self.load_depth >= MAX_LOAD_DEPTH {
            return Err(CommandError::LoadDepthExceeded(MAX_LOAD_DEPTH));
        }
        let source = batch::read_source(path)?;
        log::info!("running command file {}", path.display());

        self.load_depth += 1;
        let report = batch::run_source(self, path, &source);
        self.load_depth -= 1;

        log::info!(
            "finished {}: {} lines, {} failed",
            path.display(),
            report.lines_scanned,
            report.failures.len()
        );
        Ok(report)
    }

    fn run_and_report(&mut self, group: Option<&str>) -> Result<String, CommandError> {
        let (name, record) = self.run_generation(group)?;
        let stats = self.statistics(&name, false)?;
        Ok(report::generation(&name, &record, &stats))
    }

    /// Explicit group name, or the current group.
    fn resolve(&self, group: Option<&str>) -> Result<String, CommandError> {
        match group {
            Some(name) => Ok(name.to_string()),
            None => self.current.clone().ok_or(CommandError::NoCurrentGroup),
        }
    }

    fn index_of(&self, name: &str) -> Result<usize, CommandError> {
        self.groups
            .iter()
            .position(|g| g.id() == name)
            .ok_or_else(|| CommandError::UnknownGroup(name.to_string()))
    }

    fn find(&self, name: &str) -> Result<&Population, CommandError> {
        self.group(name)
            .ok_or_else(|| CommandError::UnknownGroup(name.to_string()))
    }
}

#[inline]
fn random_allele<R: Rng + ?Sized>(gene: &Gene, rng: &mut R) -> char {
    if rng.random_bool(0.5) {
        gene.dominant()
    } else {
        gene.recessive()
    }
}
