#![forbid(unsafe_code)]

//! English numerals as a text source.
//!
//! Numbers are spelled in groups of three digits, each group read as its
//! hundreds followed by "and" and the remainder, then the group's scale:
//! 909,168,442 is "nine hundred and nine million one hundred and sixty-eight
//! thousand four hundred and forty-two".

const LOW: [&str; 20] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [(u64, &str); 6] = [
    (1_000_000_000_000_000_000, "quintillion"),
    (1_000_000_000_000_000, "quadrillion"),
    (1_000_000_000_000, "trillion"),
    (1_000_000_000, "billion"),
    (1_000_000, "million"),
    (1_000, "thousand"),
];

/// Spell `n` in English words.
#[must_use]
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return LOW[0].to_owned();
    }
    let mut words = Vec::new();
    let mut rest = n;
    for (value, name) in SCALES {
        let group = rest / value;
        rest %= value;
        if group > 0 {
            push_triple(&mut words, group);
            words.push(name.to_owned());
        }
    }
    if rest > 0 {
        push_triple(&mut words, rest);
    }
    words.join(" ")
}

/// Append the words for `1..=999`.
fn push_triple(words: &mut Vec<String>, n: u64) {
    let hundreds = (n / 100) as usize;
    let rest = (n % 100) as usize;
    if hundreds > 0 {
        words.push(LOW[hundreds].to_owned());
        words.push("hundred".to_owned());
        if rest > 0 {
            words.push("and".to_owned());
        }
    }
    match rest {
        0 => {}
        1..=19 => words.push(LOW[rest].to_owned()),
        _ if rest % 10 == 0 => words.push(TENS[rest / 10].to_owned()),
        _ => words.push(format!("{}-{}", TENS[rest / 10], LOW[rest % 10])),
    }
}

/// Counts upward from a starting number, yielding each number in words.
///
/// Ends only after `u64::MAX`.
#[derive(Debug, Clone, Default)]
pub struct NumberWords {
    next: Option<u64>,
}

impl NumberWords {
    /// Count from zero.
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    #[must_use]
    pub fn starting_at(start: u64) -> Self {
        Self { next: Some(start) }
    }
}

impl Iterator for NumberWords {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let n = self.next?;
        self.next = n.checked_add(1);
        Some(number_to_words(n))
    }
}
