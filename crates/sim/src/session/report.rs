//! Text rendering of command results.

use std::fmt::Write;

use crate::base::Gene;
use crate::simulation::{BreedRecord, Population, Statistics};

pub fn gene_added(gene: &Gene) -> String {
    format!(
        "Gene {} defined (dominant {}: {}, recessive {}: {})",
        gene.symbol(),
        gene.dominant(),
        gene.dominant_trait(),
        gene.recessive(),
        gene.recessive_trait()
    )
}

pub fn gene_deleted(gene: &Gene) -> String {
    format!("Gene {} deleted", gene.symbol())
}

/// Overview of all groups, marking the current one.
pub fn group_list(groups: &[Population], current: Option<&str>) -> String {
    if groups.is_empty() {
        return "No groups defined.".to_string();
    }
    let mut out = String::from("Groups:");
    for pop in groups {
        let marker = if Some(pop.id()) == current { " (current)" } else { "" };
        let _ = write!(
            out,
            "\n  {}{} organisms: {} mode: {} generations: {}",
            pop.id(),
            marker,
            pop.size(),
            pop.mode(),
            pop.generation()
        );
    }
    out
}

/// Numbered member listing of one group.
pub fn member_list(pop: &Population) -> String {
    let mut out = format!("Group [{}] members ({} total):", pop.id(), pop.size());
    for (i, (genotype, count)) in pop.member_counts().into_iter().enumerate() {
        let _ = write!(out, "\n{}. {} x{}", i + 1, genotype, count);
    }
    out
}

/// Full `/show` report: tables sorted by descending count.
pub fn statistics(name: &str, stats: &Statistics, details: bool) -> String {
    let mut out = format!("=== {name} statistics ===\nTotal organisms: {}", stats.total);

    out.push_str("\n\nGenotypes:");
    for freq in stats.genotypes_by_count() {
        let _ = write!(
            out,
            "\n  {}: {} ({})",
            freq.genotype,
            freq.count,
            percent(freq.ratio)
        );
    }

    out.push_str("\n\nPhenotypes:");
    for freq in stats.phenotypes_by_count() {
        let _ = write!(
            out,
            "\n  {}:\n    count: {} share: {}",
            freq.label(),
            freq.count,
            percent(freq.ratio)
        );
        if details {
            let _ = write!(out, "\n    genotypes: {}", freq.genotypes.join(", "));
        }
    }

    if details {
        out.push_str("\n\nTrait combinations:");
        for row in &stats.details {
            let _ = write!(
                out,
                "\n  {} -> {} ({}, {})",
                row.genotype,
                row.traits,
                row.count,
                percent(row.ratio)
            );
        }
    }
    out
}

/// Result of one breeding step followed by compact tables in first-seen
/// order.
pub fn generation(name: &str, record: &BreedRecord, stats: &Statistics) -> String {
    let mut out = format!(
        "=== Group {name} bred ===\nParents: {} -> offspring: {}\nThe parent generation has been replaced.",
        record.parent_count, record.child_count
    );
    out.push_str("\n\nGenotypes:");
    for freq in &stats.genotypes {
        let _ = write!(out, "\n  {}: {} ({})", freq.genotype, freq.count, percent(freq.ratio));
    }
    out.push_str("\n\nPhenotypes:");
    for freq in &stats.phenotypes {
        let _ = write!(out, "\n  {}: {} ({})", freq.label(), freq.count, percent(freq.ratio));
    }
    out
}

/// Summary of a `/runs` repetition.
pub fn repeated(name: &str, records: &[BreedRecord], stats: &Statistics) -> String {
    let mut out = format!("=== Group {name}: {} generation(s) bred ===", records.len());
    for (i, record) in records.iter().enumerate() {
        let _ = write!(
            out,
            "\n  run {}: {} -> {}",
            i + 1,
            record.parent_count,
            record.child_count
        );
    }
    out.push_str("\n\nGenotypes:");
    for freq in &stats.genotypes {
        let _ = write!(out, "\n  {}: {} ({})", freq.genotype, freq.count, percent(freq.ratio));
    }
    out
}

#[inline]
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}
