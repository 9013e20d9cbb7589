//! Population management and operations.
//!
//! A `Population` is a named multiset of genotypes that share one locus
//! structure. It owns its mating mode and an append-only breeding history.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use rand::Rng;

use crate::base::GeneRegistry;
use crate::errors::PopulationError;
use crate::genome::{validate, Genotype};
use crate::simulation::breeding::{produce_child, select_pairs, BreedRecord, MatingMode};
use crate::simulation::Statistics;

/// Largest number of organisms a single population may hold.
pub const MAX_ORGANISMS: usize = 1 << 24;

/// A population of diploid organisms, stored as genotypes.
#[derive(Debug, Clone)]
pub struct Population {
    /// Population name
    id: Arc<str>,
    /// Organisms in insertion order (order carries no statistical meaning)
    organisms: Vec<Genotype>,
    /// Gene symbol of each locus, locked by the first organism
    structure: Vec<char>,
    /// Genotype length in characters, locked together with `structure`
    gene_length: usize,
    mode: MatingMode,
    history: Vec<BreedRecord>,
}

impl Population {
    /// Create a new empty population.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            organisms: Vec::new(),
            structure: Vec::new(),
            gene_length: 0,
            mode: MatingMode::default(),
            history: Vec::new(),
        }
    }

    /// Get population ID.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Copy of this population under a different name.
    pub fn renamed(&self, id: impl Into<Arc<str>>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Get the number of organisms in the population.
    pub fn size(&self) -> usize {
        self.organisms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisms.is_empty()
    }

    pub fn organisms(&self) -> &[Genotype] {
        &self.organisms
    }

    /// Gene symbols of the locked locus structure.
    pub fn structure(&self) -> &[char] {
        &self.structure
    }

    /// Locked genotype length (0 until the first organism arrives).
    pub fn gene_length(&self) -> usize {
        self.gene_length
    }

    pub fn mode(&self) -> MatingMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: MatingMode) {
        self.mode = mode;
    }

    pub fn history(&self) -> &[BreedRecord] {
        &self.history
    }

    /// Number of generations bred so far.
    pub fn generation(&self) -> usize {
        self.history.len()
    }

    /// Lock the locus order and length to those of `text`.
    ///
    /// Called when an organism enters an empty population. A gene may occupy
    /// only one locus.
    pub fn initialize_structure(
        &mut self,
        text: &str,
        registry: &GeneRegistry,
    ) -> Result<(), PopulationError> {
        let genotype = validate(text, registry)?;
        self.lock_structure(&genotype)
    }

    fn lock_structure(&mut self, genotype: &Genotype) -> Result<(), PopulationError> {
        let mut seen = HashSet::new();
        let structure = genotype
            .gene_symbols()
            .map(|symbol| {
                if seen.insert(symbol) {
                    Ok(symbol)
                } else {
                    Err(PopulationError::RepeatedLocus(symbol))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.structure = structure;
        self.gene_length = genotype.len();
        Ok(())
    }

    /// Validate `text` and append it as a new organism.
    pub fn add_organism(&mut self, text: &str, registry: &GeneRegistry) -> Result<(), PopulationError> {
        let genotype = validate(text, registry)?;
        self.insert(genotype)
    }

    /// Append `amount` copies of `genotype`.
    pub fn add_copies(&mut self, genotype: &Genotype, amount: usize) -> Result<(), PopulationError> {
        if amount == 0 {
            return Ok(());
        }
        self.check_capacity(amount)?;
        self.organisms
            .try_reserve(amount)
            .map_err(|_| self.too_large(amount))?;
        self.insert(genotype.clone())?;
        self.organisms
            .extend(std::iter::repeat(genotype).take(amount - 1).cloned());
        Ok(())
    }

    /// Append an already validated genotype.
    pub fn insert(&mut self, genotype: Genotype) -> Result<(), PopulationError> {
        self.check_capacity(1)?;
        if self.organisms.is_empty() {
            self.lock_structure(&genotype)?;
        } else {
            self.check_compatible(&genotype)?;
        }
        self.organisms.push(genotype);
        Ok(())
    }

    /// Check `genotype` against the locked length and locus order.
    ///
    /// An empty population accepts anything here; its structure is locked
    /// again by the next insertion.
    pub fn check_compatible(&self, genotype: &Genotype) -> Result<(), PopulationError> {
        if self.organisms.is_empty() {
            return Ok(());
        }
        if genotype.len() != self.gene_length {
            return Err(PopulationError::LengthMismatch {
                expected: self.gene_length,
                found: genotype.len(),
            });
        }
        if !genotype.gene_symbols().eq(self.structure.iter().copied()) {
            return Err(PopulationError::StructureMismatch {
                expected: self.structure.iter().collect(),
                found: genotype.gene_symbols().collect(),
            });
        }
        Ok(())
    }

    /// Fail with `PopulationTooLarge` unless `additional` more organisms fit.
    pub fn check_capacity(&self, additional: usize) -> Result<(), PopulationError> {
        match self.organisms.len().checked_add(additional) {
            Some(total) if total <= MAX_ORGANISMS => Ok(()),
            _ => Err(self.too_large(additional)),
        }
    }

    fn too_large(&self, requested: usize) -> PopulationError {
        PopulationError::PopulationTooLarge {
            requested,
            current: self.organisms.len(),
            limit: MAX_ORGANISMS,
        }
    }

    /// Remove exactly `amount` copies of `genotype`.
    ///
    /// Surviving copies of `genotype` move to the end of the list; the
    /// relative order of all other organisms is kept.
    pub fn remove_copies(&mut self, genotype: &Genotype, amount: usize) -> Result<(), PopulationError> {
        let available = self.count(genotype);
        if available < amount {
            return Err(PopulationError::InsufficientQuantity {
                genotype: genotype.to_string(),
                requested: amount,
                available,
            });
        }
        self.organisms.retain(|g| g != genotype);
        self.organisms
            .extend(std::iter::repeat(genotype).take(available - amount).cloned());
        Ok(())
    }

    /// Number of organisms with exactly this genotype.
    pub fn count(&self, genotype: &Genotype) -> usize {
        self.organisms.iter().filter(|g| *g == genotype).count()
    }

    /// Distinct genotypes with their counts, in first-seen order.
    pub fn member_counts(&self) -> Vec<(&Genotype, usize)> {
        let mut counts: Vec<(&Genotype, usize)> = Vec::new();
        let mut slot: HashMap<&Genotype, usize> = HashMap::new();
        for genotype in &self.organisms {
            match slot.get(genotype) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    slot.insert(genotype, counts.len());
                    counts.push((genotype, 1));
                }
            }
        }
        counts
    }

    /// True if any organism carries a locus of gene `symbol`.
    pub fn carries(&self, symbol: char) -> bool {
        self.organisms.iter().any(|g| g.carries(symbol))
    }

    pub fn statistics(
        &self,
        registry: &GeneRegistry,
        with_details: bool,
    ) -> Result<Statistics, PopulationError> {
        Ok(Statistics::compute(&self.organisms, registry, with_details)?)
    }

    /// Replace the population with one bred generation.
    ///
    /// Pairs are chosen according to the mating mode and each pair yields one
    /// child. The parents are discarded; only a `BreedRecord` survives. On
    /// error the population is left untouched.
    pub fn breed<R: Rng + ?Sized>(
        &mut self,
        registry: &GeneRegistry,
        rng: &mut R,
    ) -> Result<BreedRecord, PopulationError> {
        let parent_count = self.organisms.len();
        if parent_count < 2 {
            return Err(PopulationError::InsufficientPopulation(parent_count));
        }

        let pairs = select_pairs(self.mode, &self.organisms, rng);
        let next = pairs
            .iter()
            .map(|&(p1, p2)| produce_child(&self.organisms[p1], &self.organisms[p2], registry, rng))
            .collect::<Result<Vec<_>, _>>()?;

        let record = BreedRecord {
            parent_count,
            child_count: next.len(),
        };
        log::debug!(
            "population {} bred in {} mode: {} -> {}",
            self.id,
            self.mode,
            record.parent_count,
            record.child_count
        );
        self.organisms = next;
        self.history.push(record);
        Ok(record)
    }
}
