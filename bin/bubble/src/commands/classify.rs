use bubble_companion::{classify_kind, IntentClassifier};

pub async fn run(text: &str) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("nothing to classify: text is blank");
    }
    let classifier = IntentClassifier::new();
    println!("{}", classifier.classify(text));
    println!("kind: {}", classify_kind(text));
    Ok(())
}
