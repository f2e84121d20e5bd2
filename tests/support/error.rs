use std::error::Error as StdError;

/// Collect the messages of an error and every source below it.
pub fn chain<E>(err: E) -> Vec<String>
where
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    let boxed = err.into();
    let mut next = Some(&*boxed as &(dyn StdError + 'static));
    let mut messages = Vec::new();
    while let Some(e) = next {
        messages.push(e.to_string());
        next = e.source();
    }
    messages
}
