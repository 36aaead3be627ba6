use arity_curry::{curry, curry_with, CurryError, Variadic, WithArity};

/// Subject, verb and noun, then any number of adjectives.
fn build(words: Vec<&str>) -> String {
    match words.as_slice() {
        [subject, verb, noun, adjectives @ ..] => {
            let adjectives = if adjectives.is_empty() {
                String::new()
            } else {
                adjectives.join(", ") + " "
            };
            format!("{subject} {verb}ed the {adjectives}{noun}")
        }
        _ => String::new(),
    }
}

fn main() -> Result<(), CurryError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("{}", build(vec!["Charlie", "punch", "clown", "big", "scary", "dirty"]));
    println!("{}", build(vec!["Charlie", "kick", "spider", "brown", "ugly"]));
    println!("{}", build(vec!["Charlie", "attack", "cake"]));

    // With any number of adjectives there is no point at which to stop.
    match curry(Variadic(build)) {
        Err(err) => println!("variadic: {err}"),
        Ok(curried) => println!("variadic: unexpectedly curried {curried:?}"),
    }

    // Fixing the number of words makes it curryable.
    let charlie = curry_with(WithArity(4, build), ["Charlie"])?;
    let sentence = charlie.call(["kick"])?.call(["spider", "ugly"])?.complete();
    println!("{}", sentence.unwrap_or_default());
    Ok(())
}
