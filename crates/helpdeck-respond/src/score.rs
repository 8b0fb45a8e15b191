//! Occurrence scoring and keyword-driven summarization.

use helpdeck_store::Document;

/// A retrieved document with its relevance score. Ephemeral; never persisted.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub document: &'a Document,
    pub score: usize,
}

/// Pick the best document by summed keyword occurrence counts. The scan
/// replaces the leader only on a strictly greater score, so ties and the
/// all-zero case resolve to the earliest document. Empty input gives `None`;
/// empty keywords give the first document with score 0.
pub fn best_match<'a>(documents: &'a [Document], keywords: &[String]) -> Option<Candidate<'a>> {
    if documents.is_empty() {
        return None;
    }

    let mut best = Candidate {
        document: &documents[0],
        score: score_document(&documents[0], keywords),
    };
    for document in &documents[1..] {
        let score = score_document(document, keywords);
        if score > best.score {
            best = Candidate { document, score };
        }
    }
    Some(best)
}

fn score_document(document: &Document, keywords: &[String]) -> usize {
    let content = document.content_text().to_lowercase();
    keywords
        .iter()
        .map(|kw| content.matches(kw.to_lowercase().as_str()).count())
        .sum()
}

/// Split into sentence bodies, dropping the terminating punctuation.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if (b == b'.' || b == b'!' || b == b'?')
            && (i + 1 >= bytes.len() || bytes[i + 1].is_ascii_whitespace())
        {
            let s = text[start..i].trim();
            if !s.is_empty() {
                sentences.push(s);
            }
            start = i + 1;
        }
    }
    let s = text[start..].trim();
    if !s.is_empty() {
        sentences.push(s);
    }
    sentences
}

/// Summarize content for a reply. Sentences longer than 20 chars are scored
/// by the number of distinct keywords they contain (case-insensitive), then
/// stable-sorted descending. The top 3 scoring sentences are stitched back
/// into prose; if nothing scores, the first 2 sentences stand in.
pub fn summarize(content: &str, keywords: &[String]) -> String {
    let sentences: Vec<&str> = split_sentences(content)
        .into_iter()
        .filter(|s| s.len() > 20)
        .collect();

    let mut scored: Vec<(usize, &str)> = sentences
        .iter()
        .map(|&sent| {
            let lower = sent.to_lowercase();
            let hits = keywords
                .iter()
                .filter(|kw| lower.contains(kw.to_lowercase().as_str()))
                .count();
            (hits, sent)
        })
        .collect();
    // Stable sort: equal scores keep original text order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let any_hits = scored.first().map(|(hits, _)| *hits > 0).unwrap_or(false);
    let picked: Vec<&str> = if any_hits {
        scored
            .iter()
            .filter(|(hits, _)| *hits > 0)
            .take(3)
            .map(|&(_, s)| s)
            .collect()
    } else {
        scored.iter().take(2).map(|&(_, s)| s).collect()
    };

    format!("{}.", picked.join(". "))
}
