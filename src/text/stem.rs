// Light suffix stripping for English tokens.
//
// Implements step 1 of the Porter algorithm (plurals, -ed/-ing, terminal y),
// which is where most inflectional variation in news copy lives. The later
// derivational steps are skipped: they conflate too aggressively for short
// corpora ("general" / "generate").

/// Stem a lowercase token. Tokens shorter than three characters are returned unchanged.
pub fn stem(word: &str) -> String {
    if word.chars().count() < 3 || !word.is_ascii() {
        return word.to_string();
    }
    let w = step_1a(word);
    let w = step_1b(&w);
    step_1c(&w)
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn has_vowel(word: &str) -> bool {
    word.chars().any(is_vowel)
}

/// Number of vowel-consonant sequences ("measure" in Porter's paper).
fn measure(word: &str) -> usize {
    let mut count = 0;
    let mut prev_vowel = false;
    for c in word.chars() {
        let vowel = is_vowel(c);
        if !vowel && prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }
    count
}

fn ends_with_double_consonant(word: &str) -> bool {
    let b = word.as_bytes();
    b.len() >= 2 && b[b.len() - 1] == b[b.len() - 2] && !is_vowel(b[b.len() - 1] as char)
}

/// consonant-vowel-consonant ending, final consonant not w, x or y
fn ends_with_cvc(word: &str) -> bool {
    let b = word.as_bytes();
    if b.len() < 3 {
        return false;
    }
    let (c1, v, c2) = (b[b.len() - 3] as char, b[b.len() - 2] as char, b[b.len() - 1] as char);
    !is_vowel(c1) && is_vowel(v) && !is_vowel(c2) && !matches!(c2, 'w' | 'x' | 'y')
}

fn step_1a(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("sses") {
        format!("{stem}ss")
    } else if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}i")
    } else if word.ends_with("ss") {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

fn step_1b(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("eed") {
        return if measure(stem) > 0 {
            format!("{stem}ee")
        } else {
            word.to_string()
        };
    }

    let stripped = word
        .strip_suffix("ed")
        .or_else(|| word.strip_suffix("ing"))
        .filter(|stem| has_vowel(stem));

    match stripped {
        Some(stem) => tidy_after_1b(stem),
        None => word.to_string(),
    }
}

fn tidy_after_1b(stem: &str) -> String {
    if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
        format!("{stem}e")
    } else if ends_with_double_consonant(stem) && !stem.ends_with(['l', 's', 'z']) {
        stem[..stem.len() - 1].to_string()
    } else if measure(stem) == 1 && ends_with_cvc(stem) {
        format!("{stem}e")
    } else {
        stem.to_string()
    }
}

fn step_1c(word: &str) -> String {
    match word.strip_suffix('y') {
        Some(stem) if has_vowel(stem) => format!("{stem}i"),
        _ => word.to_string(),
    }
}
