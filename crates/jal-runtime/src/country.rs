//! ISO 3166-1 country codes
//!
//! Alpha-2 to numeric lookup for the `iso3166alpha2` and `iso3166numeric`
//! pipeline nodes. The table covers a fixed set of countries; codes outside
//! it are rejected rather than guessed.

/// `(alpha-2, numeric)` pairs, sorted by alpha-2 code
const ISO3166: &[(&str, u16)] = &[
    ("AE", 784),
    ("AM", 51),
    ("AR", 32),
    ("AT", 40),
    ("AU", 36),
    ("BE", 56),
    ("BR", 76),
    ("BY", 112),
    ("CA", 124),
    ("CH", 756),
    ("CL", 152),
    ("CN", 156),
    ("CO", 170),
    ("CZ", 203),
    ("DE", 276),
    ("DK", 208),
    ("EG", 818),
    ("ES", 724),
    ("FI", 246),
    ("FR", 250),
    ("GB", 826),
    ("GE", 268),
    ("GR", 300),
    ("HK", 344),
    ("ID", 360),
    ("IE", 372),
    ("IL", 376),
    ("IN", 356),
    ("IT", 380),
    ("JP", 392),
    ("KR", 410),
    ("KZ", 398),
    ("MX", 484),
    ("NG", 566),
    ("NL", 528),
    ("NO", 578),
    ("NZ", 554),
    ("PE", 604),
    ("PH", 608),
    ("PL", 616),
    ("PT", 620),
    ("RU", 643),
    ("SA", 682),
    ("SE", 752),
    ("SG", 702),
    ("TH", 764),
    ("TR", 792),
    ("UA", 804),
    ("US", 840),
    ("VN", 704),
    ("ZA", 710),
];

/// Numeric code for an alpha-2 code, case-sensitive
pub fn alpha2_to_numeric(code: &str) -> Option<u16> {
    ISO3166
        .binary_search_by(|(alpha2, _)| (*alpha2).cmp(code))
        .ok()
        .map(|index| ISO3166[index].1)
}

/// Whether `numeric` is a known country code
pub fn is_numeric_code(numeric: u16) -> bool {
    ISO3166.iter().any(|(_, n)| *n == numeric)
}
