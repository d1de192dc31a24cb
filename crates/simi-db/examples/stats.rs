use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use simi_db::{Dictionary, LoadMode, load_records};
use simi_types::Direction;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let usage = "usage: cargo run -p simi-db --example stats -- <qe.json> <eq.json> [lemma...]";
    let forward = args.next().map(PathBuf::from).context(usage)?;
    let reverse = args.next().map(PathBuf::from).context(usage)?;
    let lemmas: Vec<String> = args.collect();

    let qe = load_records(&forward, LoadMode::Owned)
        .with_context(|| format!("loading {}", forward.display()))?;
    let eq = load_records(&reverse, LoadMode::Owned)
        .with_context(|| format!("loading {}", reverse.display()))?;

    let dict = Dictionary::from_records(qe, eq);
    let stats = dict.statistics();

    println!("Quechua → Spanish entries: {}", stats.counts.forward);
    println!("Spanish → Quechua entries: {}", stats.counts.reverse);
    println!("Total entries            : {}", stats.counts.total);
    println!(
        "Distinct lemmas          : {} / {}",
        dict.lemmas(Direction::Forward).len(),
        dict.lemmas(Direction::Reverse).len()
    );
    println!(
        "Categories ({})          : {}",
        stats.category_count,
        stats.categories.join(" ")
    );
    println!(
        "Semantic fields ({})     : {}",
        stats.field_count,
        stats.fields.join(" ")
    );
    println!("Dialectal variant forms  : {}", stats.variant_entries);
    println!("Synonyms                 : {}", stats.synonym_entries);

    for lemma in &lemmas {
        println!();
        println!("== {lemma}");
        for entry in dict.lookup_forward(lemma) {
            println!("  qe: {}", entry.definition_text().unwrap_or("-"));
        }
        for entry in dict.lookup_reverse(lemma) {
            println!("  eq: {}", entry.definition_text().unwrap_or("-"));
        }
        for line in dict.dialect_variants(lemma) {
            println!("  variant {line}");
        }
    }

    Ok(())
}
