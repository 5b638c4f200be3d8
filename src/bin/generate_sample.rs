use std::sync::Arc;

use arrow::array::{Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

const MARKETS: [&str; 7] = ["Africa", "APAC", "Canada", "EMEA", "EU", "LATAM", "US"];
const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];
const SHIP_MODES: [&str; 4] = ["Standard Class", "Second Class", "First Class", "Same Day"];
const CATALOG: [(&str, [&str; 4]); 3] = [
    ("Technology", ["Phones", "Copiers", "Machines", "Accessories"]),
    ("Furniture", ["Chairs", "Tables", "Bookcases", "Furnishings"]),
    ("Office Supplies", ["Binders", "Paper", "Storage", "Art"]),
];
const BASKET_ITEMS: [&str; 10] = [
    "whole milk",
    "other vegetables",
    "rolls/buns",
    "soda",
    "yogurt",
    "bottled water",
    "root vegetables",
    "tropical fruit",
    "sausage",
    "pastry",
];

const ORDER_COUNT: usize = 2_000;
const RULE_COUNT: usize = 40;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct SampleOrder {
    date: NaiveDate,
    market: &'static str,
    category: &'static str,
    sub_category: &'static str,
    ship_mode: &'static str,
    sales: f64,
    profit: f64,
    quantity: i64,
    segment: &'static str,
}

fn generate_orders(rng: &mut SimpleRng) -> Vec<SampleOrder> {
    let first_day = NaiveDate::from_ymd_opt(2011, 1, 1).expect("valid date");
    (0..ORDER_COUNT)
        .map(|_| {
            let (category, subs) = CATALOG[rng.below(CATALOG.len())];
            let quantity = 1 + rng.below(9) as i64;
            let unit_price = rng.gauss(60.0, 25.0).abs() + 2.0;
            let sales = (unit_price * quantity as f64 * 100.0).round() / 100.0;
            let margin = rng.gauss(0.12, 0.2);
            SampleOrder {
                date: first_day + Days::new(rng.below(4 * 365) as u64),
                market: rng.pick(&MARKETS),
                category,
                sub_category: rng.pick(&subs),
                ship_mode: rng.pick(&SHIP_MODES),
                sales,
                profit: (sales * margin * 100.0).round() / 100.0,
                quantity,
                segment: rng.pick(&SEGMENTS),
            }
        })
        .collect()
}

fn frozenset(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|i| format!("'{i}'")).collect();
    format!("frozenset({{{}}})", quoted.join(", "))
}

fn write_orders_csv(path: &str, orders: &[SampleOrder]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Order Date",
        "Market",
        "Category",
        "Sub-Category",
        "Ship Mode",
        "Sales",
        "Profit",
        "Quantity",
        "Segment",
    ])?;
    for o in orders {
        writer.write_record([
            o.date.format("%Y-%m-%d").to_string(),
            o.market.to_string(),
            o.category.to_string(),
            o.sub_category.to_string(),
            o.ship_mode.to_string(),
            o.sales.to_string(),
            o.profit.to_string(),
            o.quantity.to_string(),
            o.segment.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_orders_parquet(path: &str, orders: &[SampleOrder]) {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid date");
    let strings = |f: fn(&SampleOrder) -> &'static str| -> StringArray {
        StringArray::from(orders.iter().map(f).collect::<Vec<_>>())
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("Order Date", DataType::Date32, false),
        Field::new("Market", DataType::Utf8, false),
        Field::new("Category", DataType::Utf8, false),
        Field::new("Sub-Category", DataType::Utf8, false),
        Field::new("Ship Mode", DataType::Utf8, false),
        Field::new("Sales", DataType::Float64, false),
        Field::new("Profit", DataType::Float64, false),
        Field::new("Quantity", DataType::Int64, false),
        Field::new("Segment", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(
                orders
                    .iter()
                    .map(|o| (o.date - epoch).num_days() as i32)
                    .collect::<Vec<_>>(),
            )),
            Arc::new(strings(|o| o.market)),
            Arc::new(strings(|o| o.category)),
            Arc::new(strings(|o| o.sub_category)),
            Arc::new(strings(|o| o.ship_mode)),
            Arc::new(Float64Array::from(orders.iter().map(|o| o.sales).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(orders.iter().map(|o| o.profit).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(orders.iter().map(|o| o.quantity).collect::<Vec<_>>())),
            Arc::new(strings(|o| o.segment)),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn write_rules_csv(path: &str, rng: &mut SimpleRng) -> csv::Result<usize> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["antecedents", "consequents", "support", "confidence", "lift"])?;

    let mut written = 0;
    while written < RULE_COUNT {
        let a = rng.pick(&BASKET_ITEMS);
        let c = rng.pick(&BASKET_ITEMS);
        if a == c {
            continue;
        }
        let antecedents = if rng.next_f64() < 0.25 {
            let extra = rng.pick(&BASKET_ITEMS);
            if extra == a || extra == c { vec![a] } else { vec![a, extra] }
        } else {
            vec![a]
        };
        let support = 0.005 + rng.next_f64() * 0.07;
        let confidence = 0.1 + rng.next_f64() * 0.5;
        let lift = 0.7 + rng.next_f64() * 2.3;
        writer.write_record([
            frozenset(&antecedents),
            frozenset(&[c]),
            format!("{support:.6}"),
            format!("{confidence:.6}"),
            format!("{lift:.6}"),
        ])?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let orders = generate_orders(&mut rng);
    write_orders_csv("orders_cleaned.csv", &orders).expect("Failed to write orders CSV");
    write_orders_parquet("orders_cleaned.parquet", &orders);
    let rules = write_rules_csv("association_rules_results.csv", &mut rng).expect("Failed to write rules CSV");

    println!(
        "Wrote {} orders to orders_cleaned.csv / orders_cleaned.parquet and {rules} rules to association_rules_results.csv",
        orders.len()
    );
}
