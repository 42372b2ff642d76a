//! Writes two deterministic sample CSVs for manual testing:
//! `catalog_sample.csv` (media catalog) and `survey_sample.csv`
//! (student well-being survey, with raw un-normalized headers).

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn write_catalog(rng: &mut SimpleRng) -> usize {
    let genres = [
        "Drama",
        "Comedy",
        "Action",
        "Documentary",
        "Kids",
        "Horror",
        "Suspense",
        "Romance",
    ];
    let ratings = ["13+", "16+", "18+", "ALL", "PG-13", "R", "TV-14", "TV-MA"];
    let directors = [
        "Mark Knight",
        "Sofia Alvarez",
        "Hiro Tanaka",
        "Priya Nair",
        "Jean Moreau",
        "Ana Costa",
    ];
    let countries = [
        "United States",
        "India",
        "United Kingdom",
        "Canada",
        "France",
        "Japan",
    ];
    let months = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];

    let mut writer =
        csv::Writer::from_path("catalog_sample.csv").expect("Failed to create catalog_sample.csv");
    writer
        .write_record([
            "show_id",
            "type",
            "title",
            "director",
            "country",
            "date_added",
            "release_year",
            "rating",
            "duration",
            "listed_in",
        ])
        .expect("Failed to write catalog header");

    let n = 400;
    for i in 0..n {
        let is_movie = rng.chance(0.7);
        let release_year = 2010 + (rng.next_u64() % 14) as i64;
        let duration = if is_movie {
            format!("{} min", 60 + rng.next_u64() % 120)
        } else {
            format!("{} Seasons", 1 + rng.next_u64() % 6)
        };
        let listed_in = if rng.chance(0.4) {
            format!("{}, {}", rng.pick(&genres), rng.pick(&genres))
        } else {
            rng.pick(&genres).to_string()
        };
        let director = if rng.chance(0.8) {
            rng.pick(&directors).to_string()
        } else {
            String::new()
        };
        let country = if rng.chance(0.85) {
            rng.pick(&countries).to_string()
        } else {
            String::new()
        };
        let date_added = format!(
            "{} {}, {}",
            rng.pick(&months),
            1 + rng.next_u64() % 28,
            release_year + (rng.next_u64() % 3) as i64
        );

        writer
            .write_record([
                format!("s{}", i + 1),
                if is_movie { "Movie" } else { "TV Show" }.to_string(),
                format!("Sample Title {}", i + 1),
                director,
                country,
                date_added,
                release_year.to_string(),
                rng.pick(&ratings).to_string(),
                duration,
                listed_in,
            ])
            .expect("Failed to write catalog row");
    }
    writer.flush().expect("Failed to flush catalog_sample.csv");
    n
}

fn write_survey(rng: &mut SimpleRng) -> usize {
    let genders = ["Female", "Male"];
    let courses = [
        "Engineering",
        "BIT",
        "BCS",
        "Law",
        "Mathematics",
        "Biomedical science",
        "Psychology",
    ];
    // Mixed casing on purpose, matching real survey exports.
    let study_years = ["year 1", "year 2", "year 3", "year 4", "Year 1", "Year 2"];
    let cgpa_bands = [
        "0 - 1.99",
        "2.00 - 2.49",
        "2.50 - 2.99",
        "3.00 - 3.49",
        "3.50 - 4.00",
    ];

    let mut writer =
        csv::Writer::from_path("survey_sample.csv").expect("Failed to create survey_sample.csv");
    writer
        .write_record([
            "Timestamp",
            "Choose your gender",
            "Age",
            "What is your course?",
            "Your current year of study",
            "What is your CGPA?",
            "Marital status",
            "Do you have Depression?",
            "Do you have Anxiety?",
            "Do you have Panic attack?",
            "Did you seek any specialist for a treatment?",
        ])
        .expect("Failed to write survey header");

    let yes_no = |rng: &mut SimpleRng, p: f64| if rng.chance(p) { "Yes" } else { "No" };

    let n = 150;
    for _ in 0..n {
        let timestamp = format!(
            "{}/{}/2020 {}:{:02}",
            1 + rng.next_u64() % 12,
            1 + rng.next_u64() % 28,
            8 + rng.next_u64() % 12,
            rng.next_u64() % 60
        );
        let row = [
            timestamp,
            rng.pick(&genders).to_string(),
            (18 + rng.next_u64() % 7).to_string(),
            rng.pick(&courses).to_string(),
            rng.pick(&study_years).to_string(),
            rng.pick(&cgpa_bands).to_string(),
            yes_no(rng, 0.15).to_string(),
            yes_no(rng, 0.35).to_string(),
            yes_no(rng, 0.34).to_string(),
            yes_no(rng, 0.33).to_string(),
            yes_no(rng, 0.06).to_string(),
        ];
        writer.write_record(row).expect("Failed to write survey row");
    }
    writer.flush().expect("Failed to flush survey_sample.csv");
    n
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let catalog_rows = write_catalog(&mut rng);
    let survey_rows = write_survey(&mut rng);
    println!("Wrote {catalog_rows} titles to catalog_sample.csv");
    println!("Wrote {survey_rows} respondents to survey_sample.csv");
}
