//! JAL Compiler Demo
//!
//! Walks an age check program through the full pipeline:
//! 1. Parse the program document
//! 2. Translate it to an o1js ZkProgram
//! 3. Convert a setup payload into the program inputs

use jal_compiler::{parse_program, Jal};
use serde_json::json;

const PROGRAM: &str = r#"{
    "target": "o1js:zk-program",
    "inputSchema": {
        "private": {
            "birthDate": {
                "type": "setup",
                "transLinks": ["isodate-unixtime", "unixtime-uint64", "uint64-mina:uint64"]
            }
        },
        "public": {
            "context": {
                "now": {
                    "type": "setup",
                    "transLinks": ["isodate-unixtime", "unixtime-uint64", "uint64-mina:uint64"]
                }
            }
        }
    },
    "commands": [
        { "sub": { "in": [
            { "type": "reference", "path": ["public", "context", "now"] },
            { "type": "reference", "path": ["private", "birthDate"] }
        ], "out": "ageMs" } },
        { "greaterEqual": { "in": [
            { "type": "reference", "path": ["ageMs"] },
            { "type": "static", "value": 568036800000, "transLinks": ["uint64-mina:uint64"] }
        ], "out": "isAdult" } },
        { "assert": { "in": [ { "type": "reference", "path": ["isAdult"] } ] } }
    ]
}"#;

fn main() {
    println!("\n=== JAL Compiler Demo ===\n");

    println!("STEP 1: Parse program");
    println!("─────────────────────");
    let program = parse_program(PROGRAM).expect("Failed to parse program");
    println!("  Target: {}", program.target);
    println!("  Variables: {}", program.input_schema.leaf_count());
    println!("  Commands: {}", program.commands.len());
    println!();

    let jal = Jal::new();
    let bound = jal.init_program(program);

    println!("STEP 2: Translate to o1js");
    println!("─────────────────────────");
    let source = bound.translate().expect("Failed to translate program");
    println!("{}", source);

    println!("STEP 3: Convert setup to program input");
    println!("──────────────────────────────────────");
    let setup = json!({
        "private": { "birthDate": "2000-06-08" },
        "public": { "context": { "now": "2024-01-01T00:00:00Z" } }
    });
    let input = bound.to_input(&setup).expect("Failed to convert setup");
    println!("{}", serde_json::to_string_pretty(&input).expect("Failed to serialize input"));

    println!("\n=== Demo complete ===\n");
}
