use std::process::ExitCode;

use ccx_inp::Deck;
use ccx_model::{Element, FrozenModel, Model, ModelStatistics};
use ccx_section::{BlockReport, SectionConfig, element_views, read_sections};
use log::info;
use serde_json::json;

fn usage() {
    eprintln!("usage: ccx-cli sections <input.inp> [--json] [--nprop N] [--threads N]");
}

struct Args {
    input: String,
    json: bool,
    property_capacity: Option<usize>,
    threads: Option<usize>,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let (command, rest) = args.split_first()?;
    if command != "sections" {
        return None;
    }
    let mut input = None;
    let mut json = false;
    let mut property_capacity = None;
    let mut threads = None;

    let mut iter = rest.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--nprop" => property_capacity = Some(iter.next()?.parse().ok()?),
            "--threads" => threads = Some(iter.next()?.parse().ok().filter(|&n: &usize| n > 0)?),
            flag if flag.starts_with("--") => return None,
            path if input.is_none() => input = Some(path.to_string()),
            _ => return None,
        }
    }

    Some(Args {
        input: input?,
        json,
        property_capacity,
        threads,
    })
}

/// Workers for the partitioner; rayon's pool size unless given on the command line.
fn worker_count(threads: Option<usize>) -> usize {
    threads.unwrap_or_else(rayon::current_num_threads)
}

/// Counts for one worker's share of the elements.
struct PartitionSummary {
    first: Option<i32>,
    last: Option<i32>,
    elements: usize,
    sectioned: usize,
    user_beams: usize,
}

fn summarize(elements: &[&Element]) -> PartitionSummary {
    PartitionSummary {
        first: elements.first().map(|e| e.id),
        last: elements.last().map(|e| e.id),
        elements: elements.len(),
        sectioned: elements.iter().filter(|e| e.has_section()).count(),
        user_beams: elements.iter().filter(|e| e.property_offset().is_some()).count(),
    }
}

fn print_summary(stats: &ModelStatistics, blocks: &[BlockReport], partitions: &[PartitionSummary]) {
    println!("{}", stats.format());
    println!("beam_section_blocks: {}", blocks.len());
    for block in blocks {
        println!(
            "  line {}: elset={} shape={:?} members={} thickness={:?} normal_offset={}",
            block.line, block.elset, block.shape, block.members, block.thickness, block.normal_offset
        );
        if let Some(offset) = block.property_offset {
            println!("    property_offset={offset}");
        }
        for warning in &block.warnings {
            println!("    warning: {warning}");
        }
    }
    println!("partitions: {}", partitions.len());
    for (index, part) in partitions.iter().enumerate() {
        match (part.first, part.last) {
            (Some(first), Some(last)) => println!(
                "  {index}: elements {first}..={last} ({}), sectioned {}, user beams {}",
                part.elements, part.sectioned, part.user_beams
            ),
            _ => println!("  {index}: empty"),
        }
    }
}

fn print_json(
    stats: &ModelStatistics,
    blocks: &[BlockReport],
    model: &FrozenModel,
    partitions: &[PartitionSummary],
) -> serde_json::Result<()> {
    let partitions: Vec<_> = partitions
        .iter()
        .map(|part| {
            json!({
                "first": part.first,
                "last": part.last,
                "elements": part.elements,
                "sectioned": part.sectioned,
                "user_beams": part.user_beams,
            })
        })
        .collect();
    let output = json!({
        "statistics": {
            "nodes": stats.num_nodes,
            "elements": stats.num_elements,
            "beams": stats.num_beams,
            "user_beams": stats.num_user_beams,
            "node_slots": stats.num_node_slots,
        },
        "blocks": blocks,
        "elements": element_views(model),
        "partitions": partitions,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&args) else {
        usage();
        return ExitCode::from(2);
    };

    let deck = match Deck::parse_file(&args.input) {
        Ok(deck) => deck,
        Err(err) => {
            eprintln!("parse error: {err}");
            return ExitCode::from(1);
        }
    };
    let mut model = match Model::from_deck(&deck) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("model error: {err}");
            return ExitCode::from(1);
        }
    };

    let config = SectionConfig {
        property_capacity: args.property_capacity,
    };
    let blocks = match read_sections(&mut model, &deck, &config) {
        Ok(blocks) => blocks,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(1);
        }
    };

    let stats = model.statistics();
    let model = model.freeze();
    let workers = worker_count(args.threads);
    info!("partitioning {} element(s) over {workers} worker(s)", model.active_ids().len());
    let partitions = model.par_map_partitions(workers, summarize);

    if args.json {
        if let Err(err) = print_json(&stats, &blocks, &model, &partitions) {
            eprintln!("output error: {err}");
            return ExitCode::from(1);
        }
    } else {
        print_summary(&stats, &blocks, &partitions);
    }
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags() {
        let parsed = parse_args(&args(&["sections", "frame.inp", "--json", "--threads", "4"])).unwrap();
        assert_eq!(parsed.input, "frame.inp");
        assert!(parsed.json);
        assert_eq!(parsed.threads, Some(4));
        assert_eq!(parsed.property_capacity, None);

        let parsed = parse_args(&args(&["sections", "--nprop", "40", "frame.inp"])).unwrap();
        assert_eq!(parsed.property_capacity, Some(40));
        assert_eq!(parsed.threads, None);
    }

    #[test]
    fn workers_default_to_the_rayon_pool() {
        assert_eq!(worker_count(None), rayon::current_num_threads());
        assert_eq!(worker_count(Some(3)), 3);
    }

    #[test]
    fn json_output_carries_blocks_and_elements() {
        let deck = Deck::parse_str(
            "*ELEMENT, TYPE=U1, ELSET=USER\n1, 1, 2\n*MATERIAL, NAME=STEEL\n\
             *BEAM SECTION, ELSET=USER, MATERIAL=STEEL, SECTION=CIRC\n0.2\n0, 0, 1\n",
        )
        .unwrap();
        let outcome = ccx_section::build_sections(&deck, &SectionConfig::default()).unwrap();
        let value = json!({
            "blocks": outcome.blocks,
            "elements": element_views(&outcome.model),
        });
        assert_eq!(value["blocks"][0]["shape"], "Circular");
        assert_eq!(value["blocks"][0]["property_offset"], 0);
        assert_eq!(value["elements"][0]["family_tag"], "U1      ");
        assert_eq!(value["elements"][0]["material"], "STEEL");
    }

    #[test]
    fn rejects_bad_usage() {
        assert!(parse_args(&args(&[])).is_none());
        assert!(parse_args(&args(&["analyze", "frame.inp"])).is_none());
        assert!(parse_args(&args(&["sections"])).is_none());
        assert!(parse_args(&args(&["sections", "a.inp", "b.inp"])).is_none());
        assert!(parse_args(&args(&["sections", "a.inp", "--threads", "0"])).is_none());
        assert!(parse_args(&args(&["sections", "a.inp", "--nprop"])).is_none());
        assert!(parse_args(&args(&["sections", "a.inp", "--verbose"])).is_none());
    }
}
