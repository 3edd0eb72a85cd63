use wasm_bindgen::prelude::*;

use crate::solana::LAMPORTS_PER_SOL;

#[wasm_bindgen]
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

#[wasm_bindgen]
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

/// `Abc123...xyz789` form for addresses and signatures.
pub fn abbreviate(text: &str) -> String {
    if text.len() <= 12 {
        return text.to_string();
    }
    format!("{}...{}", &text[..6], &text[text.len() - 6..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_renders_like_a_plain_number() {
        assert_eq!(lamports_to_sol(200_000_000).to_string(), "0.2");
        assert_eq!(lamports_to_sol(1_000_000_000).to_string(), "1");
        assert_eq!(lamports_to_sol(0).to_string(), "0");
    }

    #[test]
    fn sol_amounts_convert_exactly() {
        assert_eq!(sol_to_lamports(0.2), 200_000_000);
        assert_eq!(sol_to_lamports(0.1), 100_000_000);
    }

    #[test]
    fn abbreviates_long_text_only() {
        assert_eq!(
            abbreviate("APYgnq4v7MBPS3grGTBNh3Y2YJGkbvLRsrPJSWJuwrR8"),
            "APYgnq...JuwrR8"
        );
        assert_eq!(abbreviate("short"), "short");
    }
}
