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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_f64() * items.len() as f64) as usize % items.len()]
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // (model, typical price when new)
    let models: &[(&str, f64)] = &[
        ("1 Series", 22_000.0),
        ("2 Series", 24_500.0),
        ("3 Series", 29_000.0),
        ("4 Series", 33_000.0),
        ("5 Series", 38_000.0),
        ("X1", 27_000.0),
        ("X3", 36_000.0),
        ("X5", 52_000.0),
        ("M4", 62_000.0),
    ];
    let transmissions = ["Manual", "Automatic", "Semi-Auto"];
    let fuels = ["Diesel", "Petrol", "Hybrid"];
    let engines = [1.5, 2.0, 3.0];
    let tax_bands = [30.0, 125.0, 145.0, 150.0];

    let output_path = "sample_listings.csv";
    let mut writer = csv::Writer::from_path(output_path).expect("Failed to create output file");
    writer
        .write_record([
            "model",
            "year",
            "price",
            "transmission",
            "mileage",
            "fuelType",
            "tax",
            "mpg",
            "engineSize",
        ])
        .expect("Failed to write header");

    let n_rows = 2_000;
    for row in 0..n_rows {
        let (model, base_price) = *rng.pick(models);
        let year = 2013 + (rng.next_f64() * 8.0) as i64; // 2013..=2020
        let age = (2020 - year) as f64;

        let engine = *rng.pick(&engines);
        let price =
            (base_price * 0.88_f64.powf(age) * (1.0 + engine * 0.04) * rng.gauss(1.0, 0.07))
                .max(1_500.0);
        let mileage = rng.gauss(9_000.0 * age + 6_000.0, 4_000.0).max(0.0);
        let mpg = rng.gauss(52.0, 7.0).max(20.0);

        // Sprinkle a few unparseable cells so the loader's coercion path is
        // exercised by the sample file too.
        let mpg_cell = if row % 157 == 0 {
            "N/A".to_string()
        } else {
            format!("{mpg:.1}")
        };
        let tax_cell = if row % 211 == 0 {
            String::new()
        } else {
            format!("{:.0}", rng.pick(&tax_bands))
        };

        let transmission = *rng.pick(&transmissions);
        let fuel = *rng.pick(&fuels);
        let year_cell = year.to_string();
        let price_cell = format!("{price:.0}");
        let mileage_cell = format!("{mileage:.0}");
        let engine_cell = format!("{engine:.1}");
        writer
            .write_record([
                model,
                year_cell.as_str(),
                price_cell.as_str(),
                transmission,
                mileage_cell.as_str(),
                fuel,
                tax_cell.as_str(),
                mpg_cell.as_str(),
                engine_cell.as_str(),
            ])
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush output");
    println!("Wrote {n_rows} listings to {output_path}");
}
