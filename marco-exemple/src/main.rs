use std::env;
use std::path::PathBuf;

use log::info;
use marco_core::{Markov, MarkovConfig, MarkovError};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Corpus: one sentence per line
    let corpus = env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("./data/corpus.txt"));
    let snapshot = corpus.with_extension("bin");

    // Load the snapshot if it exists, otherwise learn the corpus and save one
    let mut model = if snapshot.exists() {
        Markov::load(&snapshot)?
    } else {
        let mut config = MarkovConfig::default();
        // Give up on sentences longer than 200 tokens
        config.set_max_walk(200)?;
        let model = Markov::from_corpus(&corpus, config)?;
        model.save(&snapshot)?;
        model
    };
    info!("{} contexts, {} continuations", model.context_count(), model.continuation_count());

    // Same seed, same sentences
    let mut rng = StdRng::seed_from_u64(42);
    for i in 0..10 {
        match model.generate(&mut rng) {
            Ok(text) => println!("Generated sentence {}: {}", i + 1, text),
            Err(MarkovError::EmptyModel) => {
                println!("Nothing learned yet");
                break;
            }
            Err(e) => println!("Generation failed: {}", e),
        }
    }

    // Learning then unlearning a sentence leaves the model unchanged
    let before = model.clone();
    model.learn("This sentence will be forgotten RIGHT AWAY.");
    model.unlearn("This sentence will be forgotten RIGHT AWAY.");
    println!("Unchanged after unlearn: {}", before.continuation_count() == model.continuation_count());

    // Unlearning something never learned is a no-op
    model.unlearn("Never said that!");

    Ok(())
}
