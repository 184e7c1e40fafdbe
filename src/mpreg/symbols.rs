use rand::Rng;
use rand::seq::SliceRandom;

/// PREGNANT MAN, the token used when diversity is off.
pub const VANILLA_SYMBOL: &str = "\u{1FAC3}";

/// The 13-token diversity pool: pregnant man and pregnant person, bare and
/// with each Fitzpatrick modifier, plus pregnant woman.
pub const DIVERSITY_POOL: [&str; 13] = [
    "\u{1FAC3}",
    "\u{1FAC3}\u{1F3FB}",
    "\u{1FAC3}\u{1F3FC}",
    "\u{1FAC3}\u{1F3FD}",
    "\u{1FAC3}\u{1F3FE}",
    "\u{1FAC3}\u{1F3FF}",
    "\u{1FAC4}",
    "\u{1FAC4}\u{1F3FB}",
    "\u{1FAC4}\u{1F3FC}",
    "\u{1FAC4}\u{1F3FD}",
    "\u{1FAC4}\u{1F3FE}",
    "\u{1FAC4}\u{1F3FF}",
    "\u{1F930}",
];

/// An endless supply of replacement tokens.
///
/// Implementations never run dry; the transform stage calls
/// `next_symbol` exactly once per matched character.
pub trait SymbolSource {
    fn next_symbol(&mut self) -> &str;
}

/// Always hands out the same token.
#[derive(Clone, Debug)]
pub struct Vanilla {
    symbol: String,
}

impl Vanilla {
    pub fn new(symbol: impl Into<String>) -> Self {
        Vanilla {
            symbol: symbol.into(),
        }
    }
}

impl Default for Vanilla {
    fn default() -> Self {
        Vanilla::new(VANILLA_SYMBOL)
    }
}

impl SymbolSource for Vanilla {
    #[inline]
    fn next_symbol(&mut self) -> &str {
        &self.symbol
    }
}

/// Walks a shuffled pool, reshuffling after every full pass.
///
/// Each cycle of `len()` consecutive tokens is a permutation of the pool.
/// The RNG is owned so callers can inject a seeded one.
pub struct Diversity<R> {
    pool: Vec<String>,
    pos: usize,
    rng: R,
}

impl<R: Rng> Diversity<R> {
    /// Returns `None` for an empty pool, which could never yield a token.
    pub fn new(pool: Vec<String>, rng: R) -> Option<Self> {
        if pool.is_empty() {
            return None;
        }
        // Start "exhausted" so the first request shuffles.
        let pos = pool.len();
        Some(Diversity { pool, pos, rng })
    }

    /// Diversity source over [`DIVERSITY_POOL`].
    pub fn with_default_pool(rng: R) -> Self {
        let pool: Vec<String> = DIVERSITY_POOL.iter().map(|s| s.to_string()).collect();
        let pos = pool.len();
        Diversity { pool, pos, rng }
    }

    /// Number of tokens in one cycle.
    pub fn len(&self) -> usize {
        self.pool.len()
    }
}

impl<R: Rng> SymbolSource for Diversity<R> {
    fn next_symbol(&mut self) -> &str {
        if self.pos == self.pool.len() {
            self.pool.shuffle(&mut self.rng);
            self.pos = 0;
        }
        let i = self.pos;
        self.pos += 1;
        &self.pool[i]
    }
}

/// The two source variants behind one type, so the driver can pick at runtime.
pub enum Symbols<R> {
    Vanilla(Vanilla),
    Diversity(Diversity<R>),
}

impl<R: Rng> SymbolSource for Symbols<R> {
    #[inline]
    fn next_symbol(&mut self) -> &str {
        match self {
            Symbols::Vanilla(v) => v.next_symbol(),
            Symbols::Diversity(d) => d.next_symbol(),
        }
    }
}

impl<S: SymbolSource + ?Sized> SymbolSource for &mut S {
    #[inline]
    fn next_symbol(&mut self) -> &str {
        (**self).next_symbol()
    }
}
