//! Contexts (typically page URLs) in which key handling is suspended

use regex::Regex;

/// Compiled blacklist patterns
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    /// Source text, plus the regex when it compiled
    patterns: Vec<(String, Option<Regex>)>,
}

impl Blacklist {
    /// Compile patterns; one that is not a valid regex matches literally
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .map(|p| {
                let source = p.as_ref().to_string();
                let regex = match Regex::new(&source) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        tracing::warn!("Invalid blacklist regex {:?}: {}, comparing literally", source, e);
                        None
                    }
                };
                (source, regex)
            })
            .collect();
        Self { patterns }
    }

    /// True when a pattern equals `context` or matches it
    pub fn matches(&self, context: &str) -> bool {
        self.patterns.iter().any(|(source, regex)| {
            source == context || regex.as_ref().is_some_and(|re| re.is_match(context))
        })
    }
}
