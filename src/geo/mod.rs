//! City-pair distance lookup.
//!
//! The table is keyed by ordered (origin, destination) pairs and is not
//! symmetric: an origin only knows the destinations listed under it, so the
//! reverse direction may resolve to [`FALLBACK_DISTANCE_KM`] or to a slightly
//! different figure. Both directions are kept exactly as listed.

/// Distance used for any pair the table does not list.
pub const FALLBACK_DISTANCE_KM: f64 = 500.0;

type Row = (&'static str, &'static [(&'static str, f64)]);

const DISTANCES: &[Row] = &[
    (
        "moscow",
        &[
            ("saint petersburg", 635.0),
            ("spb", 635.0),
            ("yekaterinburg", 1416.0),
            ("novosibirsk", 3354.0),
            ("krasnoyarsk", 4205.0),
            ("irkutsk", 5152.0),
            ("vladivostok", 9100.0),
            ("rostov-on-don", 1070.0),
            ("sochi", 1360.0),
            ("kazan", 820.0),
            ("nizhny novgorod", 420.0),
            ("samara", 1050.0),
            ("volgograd", 970.0),
            ("voronezh", 520.0),
            ("saratov", 850.0),
            ("perm", 1380.0),
            ("ufa", 1160.0),
            ("chelyabinsk", 1510.0),
            ("omsk", 2550.0),
            ("tyumen", 1720.0),
            ("krasnodar", 1350.0),
            ("stavropol", 1400.0),
            ("astrakhan", 1400.0),
            ("makhachkala", 1800.0),
            ("grozny", 1900.0),
            ("elista", 1200.0),
            ("yoshkar-ola", 650.0),
            ("cheboksary", 650.0),
            ("izhevsk", 1200.0),
            ("kirov", 900.0),
            ("syktyvkar", 1400.0),
            ("arkhangelsk", 1200.0),
            ("murmansk", 1900.0),
            ("petrozavodsk", 1000.0),
            ("kaliningrad", 1200.0),
        ],
    ),
    (
        "saint petersburg",
        &[
            ("spb", 0.0),
            ("moscow", 635.0),
            ("yekaterinburg", 1780.0),
            ("novosibirsk", 3720.0),
            ("kaliningrad", 550.0),
            ("murmansk", 1050.0),
            ("arkhangelsk", 1130.0),
            ("petrozavodsk", 320.0),
            ("veliky novgorod", 180.0),
            ("pskov", 280.0),
            ("tver", 480.0),
            ("vologda", 700.0),
            ("cherepovets", 650.0),
        ],
    ),
    (
        "yekaterinburg",
        &[
            ("moscow", 1416.0),
            ("saint petersburg", 1780.0),
            ("spb", 1780.0),
            ("novosibirsk", 1940.0),
            ("chelyabinsk", 200.0),
            ("perm", 360.0),
            ("tyumen", 320.0),
            ("ufa", 520.0),
            ("kurgan", 380.0),
            ("orenburg", 800.0),
            ("magnitogorsk", 300.0),
        ],
    ),
    (
        "novosibirsk",
        &[
            ("moscow", 3354.0),
            ("saint petersburg", 3720.0),
            ("spb", 3720.0),
            ("yekaterinburg", 1940.0),
            ("omsk", 650.0),
            ("krasnoyarsk", 850.0),
            ("tomsk", 270.0),
            ("barnaul", 230.0),
            ("kemerovo", 260.0),
            ("novokuznetsk", 300.0),
            ("biysk", 360.0),
            ("gorno-altaysk", 450.0),
        ],
    ),
    (
        "krasnoyarsk",
        &[
            ("moscow", 4205.0),
            ("saint petersburg", 4570.0),
            ("spb", 4570.0),
            ("novosibirsk", 850.0),
            ("irkutsk", 1060.0),
            ("abakan", 410.0),
            ("kyzyl", 460.0),
            ("norilsk", 1500.0),
            ("dudinka", 1600.0),
        ],
    ),
    (
        "irkutsk",
        &[
            ("moscow", 5152.0),
            ("saint petersburg", 5520.0),
            ("spb", 5520.0),
            ("krasnoyarsk", 1060.0),
            ("ulan-ude", 450.0),
            ("chita", 1100.0),
            ("yakutsk", 2000.0),
            ("magadan", 3000.0),
            ("petropavlovsk-kamchatsky", 4000.0),
        ],
    ),
    (
        "vladivostok",
        &[
            ("moscow", 9100.0),
            ("saint petersburg", 9470.0),
            ("spb", 9470.0),
            ("khabarovsk", 760.0),
            ("yuzhno-sakhalinsk", 1000.0),
            ("blagoveshchensk", 1100.0),
            ("petropavlovsk-kamchatsky", 2000.0),
        ],
    ),
];

/// Cyrillic spellings accepted for the table's cities.
const ALIASES: &[(&str, &str)] = &[
    ("москва", "moscow"),
    ("санкт-петербург", "saint petersburg"),
    ("спб", "spb"),
    ("екатеринбург", "yekaterinburg"),
    ("новосибирск", "novosibirsk"),
    ("красноярск", "krasnoyarsk"),
    ("иркутск", "irkutsk"),
    ("владивосток", "vladivostok"),
    ("ростов-на-дону", "rostov-on-don"),
    ("сочи", "sochi"),
    ("казань", "kazan"),
    ("нижний новгород", "nizhny novgorod"),
    ("самара", "samara"),
    ("волгоград", "volgograd"),
    ("воронеж", "voronezh"),
    ("саратов", "saratov"),
    ("пермь", "perm"),
    ("уфа", "ufa"),
    ("челябинск", "chelyabinsk"),
    ("омск", "omsk"),
    ("тюмень", "tyumen"),
    ("краснодар", "krasnodar"),
    ("ставрополь", "stavropol"),
    ("астрахань", "astrakhan"),
    ("махачкала", "makhachkala"),
    ("грозный", "grozny"),
    ("элиста", "elista"),
    ("йошкар-ола", "yoshkar-ola"),
    ("чебоксары", "cheboksary"),
    ("ижевск", "izhevsk"),
    ("киров", "kirov"),
    ("сыктывкар", "syktyvkar"),
    ("архангельск", "arkhangelsk"),
    ("мурманск", "murmansk"),
    ("петрозаводск", "petrozavodsk"),
    ("калининград", "kaliningrad"),
    ("великий новгород", "veliky novgorod"),
    ("псков", "pskov"),
    ("тверь", "tver"),
    ("вологда", "vologda"),
    ("череповец", "cherepovets"),
    ("курган", "kurgan"),
    ("оренбург", "orenburg"),
    ("магнитогорск", "magnitogorsk"),
    ("томск", "tomsk"),
    ("барнаул", "barnaul"),
    ("кемерово", "kemerovo"),
    ("новокузнецк", "novokuznetsk"),
    ("бийск", "biysk"),
    ("горно-алтайск", "gorno-altaysk"),
    ("абакан", "abakan"),
    ("кызыл", "kyzyl"),
    ("норильск", "norilsk"),
    ("дудинка", "dudinka"),
    ("улан-удэ", "ulan-ude"),
    ("чита", "chita"),
    ("якутск", "yakutsk"),
    ("магадан", "magadan"),
    ("петропавловск-камчатский", "petropavlovsk-kamchatsky"),
    ("хабаровск", "khabarovsk"),
    ("южно-сахалинск", "yuzhno-sakhalinsk"),
    ("благовещенск", "blagoveshchensk"),
];

/// Trims, lowercases and maps Cyrillic spellings onto table keys.
pub fn normalize_city(city: &str) -> String {
    let lowered = city.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(lowered)
}

pub fn distance_km(from_city: &str, to_city: &str) -> f64 {
    let from = normalize_city(from_city);
    let to = normalize_city(to_city);

    if from == to {
        return 0.0;
    }

    DISTANCES
        .iter()
        .find(|(origin, _)| *origin == from)
        .and_then(|(_, destinations)| {
            destinations
                .iter()
                .find(|(destination, _)| *destination == to)
                .map(|(_, km)| *km)
        })
        .unwrap_or(FALLBACK_DISTANCE_KM)
}

#[cfg(test)]
mod tests {
    use super::{distance_km, normalize_city, FALLBACK_DISTANCE_KM};

    #[test]
    fn zero_distance_for_same_city_regardless_of_case_and_spacing() {
        assert_eq!(distance_km("Moscow", "moscow"), 0.0);
        assert_eq!(distance_km("  MOSCOW ", "Moscow"), 0.0);
        assert_eq!(distance_km("Atlantis", " atlantis"), 0.0);
    }

    #[test]
    fn moscow_to_saint_petersburg_is_635_km() {
        assert_eq!(distance_km("Moscow", "Saint Petersburg"), 635.0);
        assert_eq!(distance_km("Saint Petersburg", "Moscow"), 635.0);
    }

    #[test]
    fn asymmetric_pairs_are_preserved() {
        assert_eq!(distance_km("Moscow", "Kazan"), 820.0);
        assert_eq!(distance_km("Kazan", "Moscow"), FALLBACK_DISTANCE_KM);

        assert_eq!(distance_km("Moscow", "SPB"), 635.0);
        assert_eq!(distance_km("SPB", "Moscow"), FALLBACK_DISTANCE_KM);

        assert_eq!(distance_km("Saint Petersburg", "spb"), 0.0);
    }

    #[test]
    fn cyrillic_names_resolve_to_the_same_entries() {
        assert_eq!(normalize_city(" Москва "), "moscow");
        assert_eq!(distance_km("Москва", "Санкт-Петербург"), 635.0);
        assert_eq!(distance_km("москва", "Moscow"), 0.0);
    }

    #[test]
    fn unknown_pair_uses_fallback() {
        assert_eq!(distance_km("Paris", "Berlin"), FALLBACK_DISTANCE_KM);
    }
}
