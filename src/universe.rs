//! Static market universes for the scanners.
//!
//! Lists are ordered roughly by index weight; the scanner truncates to its
//! own hard cap before fetching, so oversized lists are harmless.

use crate::types::Market;

/// Large-cap US names (top ~50 by weight).
pub const US_50: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "BRK-B", "LLY", "AVGO", "TSLA",
    "JPM", "V", "UNH", "XOM", "MA", "JNJ", "PG", "HD", "COST", "MRK",
    "ORCL", "ABBV", "CVX", "KO", "CRM", "BAC", "AMD", "PEP", "NFLX", "TMO",
    "WMT", "ADBE", "LIN", "MCD", "DIS", "CSCO", "ACN", "ABT", "WFC", "QCOM",
    "INTU", "TXN", "IBM", "GE", "AMAT", "CAT", "NOW", "PFE", "CMCSA", "UNP",
];

/// S&P 500 constituents (first tranche; the scanner caps the universe anyway).
pub const SP500: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "GOOGL", "GOOG", "AMZN", "META", "BRK-B", "LLY", "AVGO",
    "TSLA", "JPM", "V", "UNH", "XOM", "MA", "JNJ", "PG", "HD", "COST",
    "MRK", "ORCL", "ABBV", "CVX", "KO", "CRM", "BAC", "AMD", "PEP", "NFLX",
    "TMO", "WMT", "ADBE", "LIN", "MCD", "DIS", "CSCO", "ACN", "ABT", "WFC",
    "QCOM", "INTU", "TXN", "IBM", "GE", "AMAT", "CAT", "NOW", "PFE", "CMCSA",
    "UNP", "DHR", "VZ", "RTX", "SPGI", "PM", "GS", "HON", "NKE", "LOW",
    "T", "UPS", "COP", "NEE", "MS", "BLK", "AXP", "ELV", "BKNG", "SYK",
    "ISRG", "MDT", "TJX", "VRTX", "LMT", "PLD", "GILD", "SBUX", "C", "ADP",
    "MMC", "DE", "AMGN", "CB", "REGN", "ADI", "BSX", "MDLZ", "CI", "ETN",
    "BA", "SO", "PGR", "MU", "DUK", "ZTS", "SCHW", "BDX", "TGT", "CL",
    "LRCX", "EOG", "ITW", "SNPS", "CDNS", "MO", "APH", "CME", "FI", "SLB",
    "WM", "EQIX", "ICE", "NOC", "CSX", "MCK", "ORLY", "HCA", "EMR", "FDX",
    "PNC", "KLAC", "AON", "MPC", "SHW", "GD", "PSX", "MSI", "ROP", "APD",
];

/// European large caps (Yahoo suffixes for local exchanges).
pub const EU: &[&str] = &[
    "ASML.AS", "MC.PA", "SAP.DE", "NESN.SW", "NOVO-B.CO", "ROG.SW", "SHEL.L", "AZN.L",
    "NOVN.SW", "OR.PA", "TTE.PA", "SIE.DE", "HSBA.L", "ULVR.L", "AIR.PA", "SU.PA",
    "SAN.PA", "ALV.DE", "BP.L", "RMS.PA", "IDEXY", "EL.PA", "DTE.DE", "CDI.PA",
    "IBE.MC", "ITX.MC", "BNP.PA", "SAN.MC", "ENEL.MI", "BAS.DE", "GSK.L", "ABI.BR",
    "ISP.MI", "CS.PA", "BBVA.MC", "MUV2.DE", "DG.PA", "RIO.L", "ADS.DE", "BAYN.DE",
    "VOW3.DE", "KER.PA", "STLAM.MI", "INGA.AS", "PHIA.AS", "MBG.DE", "BMW.DE",
    "ENI.MI", "UCG.MI", "REP.MC",
];

/// Resolve the symbol list for a market, truncated to `cap` entries.
pub fn symbols(market: Market, cap: usize) -> Vec<String> {
    let list = match market {
        Market::Us50 => US_50,
        Market::Sp500 => SP500,
        Market::Eu => EU,
    };
    list.iter().take(cap).map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universes_have_no_duplicates() {
        for list in [US_50, SP500, EU] {
            let mut seen = std::collections::HashSet::new();
            for sym in list {
                assert!(seen.insert(sym), "duplicate symbol {sym}");
            }
        }
    }

    #[test]
    fn cap_truncates() {
        assert_eq!(symbols(Market::Sp500, 120).len(), 120);
        assert_eq!(symbols(Market::Us50, 120).len(), US_50.len());
    }
}
