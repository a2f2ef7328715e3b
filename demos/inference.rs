//! Provides an example of how to use velim to perform inference on a Bayesian Network.
//!
//! The network is the smoke alarm example: tampering and fire can set off the alarm, fire causes
//! smoke, the alarm makes people leave and leaving produces a report.

use velim as v;
use v::ConditionalInferenceEngine;

fn main() -> v::Result<()> {
    let tampering = v::Variable::binary();
    let fire = v::Variable::binary();
    let smoke = v::Variable::binary();
    let alarm = v::Variable::binary();
    let leaving = v::Variable::binary();
    let report = v::Variable::binary();

    /////////////////////////////////////////////////////
    // Step 1: Build Model
    let model = v::ModelBuilder::new()
        .with_named_variable(&tampering, "tampering", &[], v::Initialization::Binomial(0.02))
        .with_named_variable(&fire, "fire", &[], v::Initialization::Binomial(0.01))
        .with_named_variable(&smoke, "smoke", &[fire], v::Initialization::Table(vec![0.9, 0.1, 0.01, 0.99]))
        .with_named_variable(
            &alarm,
            "alarm",
            &[fire, tampering],
            v::Initialization::Table(vec![0.5, 0.5, 0.99, 0.01, 0.85, 0.15, 0.0001, 0.9999])
        )
        .with_named_variable(&leaving, "leaving", &[alarm], v::Initialization::Table(vec![0.88, 0.12, 0.001, 0.999]))
        .with_named_variable(&report, "report", &[leaving], v::Initialization::Table(vec![0.75, 0.25, 0.01, 0.99]))
        .build()?;

    /////////////////////////////////////////////////////
    // Step 2: Compile some evidence
    let mut evidence = v::Assignment::new();
    evidence.set(&report, true);
    evidence.set(&smoke, false);

    /////////////////////////////////////////////////////
    // Step 3: Build an inference engine
    let engine = v::VariableEliminationEngine::new(&model, &evidence)?
        .with_order(vec![alarm, fire, leaving, report, smoke, tampering]);

    /////////////////////////////////////////////////////
    // Step 4: Run Conditional Queries
    for &query in [tampering, fire, alarm, leaving].iter() {
        let p = engine.infer(query)?;
        let name = model.lookup_name(&query).map(|n| n.as_str()).unwrap_or("?");
        for (value, prob) in p.iter() {
            println!("P({} = {} | report = true, smoke = false) = {:.4}", name, value, prob);
        }
    }

    Ok(())
}
