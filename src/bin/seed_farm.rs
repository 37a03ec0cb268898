//! Farm Database Seeder
//!
//! A terminal application that fills a running farm API with crops, fields and
//! a season of operations on each field.
//!
//! Usage:
//!   `cargo run --bin seed_farm -- --url http://localhost:3000 --fields 24`

use anyhow::{Context, anyhow};
use chrono::{Duration as ChronoDuration, Local};
use clap::{Arg, Command, value_parser};
use console::style;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use rand::seq::IndexedRandom;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::Duration;

const SOIL_TYPES: [&str; 5] = ["Clay", "Clay loam", "Loam", "Sandy loam", "Silt"];
const RISKS: [&str; 3] = ["Low", "Medium", "High"];
const IRRIGATION: [&str; 3] = ["None", "Drip", "Pivot"];
const DRAINAGE: [&str; 3] = ["Good", "Moderate", "Poor"];
const FIELD_NAMES: [&str; 12] = [
    "Long Meadow",
    "Top Field",
    "Bottom Field",
    "Church Piece",
    "Mill Close",
    "Hill Ground",
    "Brook Field",
    "Old Orchard",
    "Windmill Field",
    "Little Acre",
    "Park Field",
    "Home Paddock",
];

/// (operation, detail, rate)
const OPERATIONS: [(&str, &str, &str); 6] = [
    ("Cultivation", "Disc harrow", ""),
    ("Sowing", "Certified seed", "180 kg/ha"),
    ("Fertiliser", "Ammonium nitrate", "250 kg/ha"),
    ("Spraying", "Herbicide", "2 l/ha"),
    ("Spraying", "Fungicide", "1 l/ha"),
    ("Harvest", "Combine", ""),
];

#[derive(Debug, Clone)]
pub struct SeedingConfig {
    pub base_url: String,
    pub client: Client,
    pub max_concurrent: usize,
}

#[derive(Debug, Default)]
pub struct CreatedObjects {
    pub crops: Vec<Value>,
    pub fields: Vec<Value>,
    pub operations: Vec<Value>,
}

pub struct FarmSeeder {
    config: SeedingConfig,
    created_objects: CreatedObjects,
}

fn progress_bar(len: usize) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} {msg}")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

fn random_field(index: usize, crops: &[Value]) -> Value {
    let mut rng = rand::rng();
    let base = FIELD_NAMES[index % FIELD_NAMES.len()];
    let name = if index < FIELD_NAMES.len() {
        base.to_string()
    } else {
        format!("{base} {}", index / FIELD_NAMES.len() + 1)
    };

    // Roughly one field in six is left without a crop
    let crop = if rng.random_range(0..6) == 0 {
        String::new()
    } else {
        crops
            .choose(&mut rng)
            .and_then(|c| c["id"].as_str())
            .unwrap_or_default()
            .to_string()
    };
    let sowing = Local::now().date_naive() - ChronoDuration::days(rng.random_range(30..240));

    json!({
        "name": name,
        "area": (rng.random_range(1.0..40.0_f64) * 100.0).round() / 100.0,
        "pH": (rng.random_range(5.2..7.8_f64) * 10.0).round() / 10.0,
        "SOM": (rng.random_range(1.0..8.0_f64) * 10.0).round() / 10.0,
        "soilType": SOIL_TYPES.choose(&mut rng).copied().unwrap_or("Loam"),
        "risk": RISKS.choose(&mut rng).copied().unwrap_or("Low"),
        "irrigation": IRRIGATION.choose(&mut rng).copied().unwrap_or("None"),
        "drainage": DRAINAGE.choose(&mut rng).copied().unwrap_or("Good"),
        "sowingDate": sowing.format("%Y-%m-%d").to_string(),
        "notes": "",
        "crop": crop
    })
}

async fn post_json(config: &SeedingConfig, endpoint: &str, data: &Value) -> anyhow::Result<Value> {
    let url = format!("{}{}", config.base_url, endpoint);
    let response = config.client.post(&url).json(data).send().await?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("HTTP {status} {endpoint}: {error_text}"));
    }
    Ok(response.json().await?)
}

impl FarmSeeder {
    pub fn new(base_url: &str, max_concurrent: usize) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            config: SeedingConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                client,
                max_concurrent: max_concurrent.max(1),
            },
            created_objects: CreatedObjects::default(),
        })
    }

    /// Make multiple POST requests in parallel with controlled concurrency
    async fn post_parallel(
        &self,
        requests: Vec<(String, Value)>,
        pb: &ProgressBar,
    ) -> anyhow::Result<Vec<Value>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut tasks = Vec::new();

        for (endpoint, data) in requests {
            let sem = Arc::clone(&semaphore);
            let config = self.config.clone();
            let pb_clone = pb.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = sem.acquire().await?;
                let result = post_json(&config, &endpoint, &data).await;
                pb_clone.inc(1);
                result
            }));
        }

        join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.context("Task join error")?)
            .collect()
    }

    async fn get(&self, endpoint: &str) -> anyhow::Result<Value> {
        let url = format!("{}{}", self.config.base_url, endpoint);
        let response = self.config.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!("HTTP {status} {endpoint}: {error_text}"));
        }
        Ok(response.json().await?)
    }

    pub async fn test_connection(&self) -> anyhow::Result<()> {
        let health = self
            .get("/healthz")
            .await
            .with_context(|| format!("API at {} is not reachable", self.config.base_url))?;
        if health["status"] != "ok" {
            return Err(anyhow!("API reports status {}", health["status"]));
        }
        Ok(())
    }

    pub async fn create_crops(&mut self) -> anyhow::Result<()> {
        println!("{} Creating crops...", style("[1/3]").bold().dim());

        let crops_data = vec![
            json!({"id": "WHT", "name": "Winter wheat", "sowing": "Autumn", "targetYield": 8.5, "value": 190.0}),
            json!({"id": "BAR", "name": "Spring barley", "sowing": "Spring", "targetYield": 6.5, "value": 170.0}),
            json!({"id": "OSR", "name": "Oilseed rape", "sowing": "Late summer", "targetYield": 3.6, "value": 420.0}),
            json!({"id": "BEA", "name": "Field beans", "sowing": "Spring", "targetYield": 4.5, "value": 230.0}),
            json!({"id": "MAI", "name": "Maize", "sowing": "Late spring", "targetYield": 11.0, "value": 150.0}),
        ];

        let pb = progress_bar(crops_data.len())?;
        for crop_data in crops_data {
            let id = crop_data["id"].as_str().unwrap_or_default().to_string();
            pb.set_message(format!("Creating: {id}"));

            let url = format!("{}/api/crops", self.config.base_url);
            let response = self.config.client.post(&url).json(&crop_data).send().await?;
            match response.status() {
                status if status.is_success() => {
                    self.created_objects.crops.push(response.json().await?);
                }
                // Seeding twice keeps the crops from the first run
                StatusCode::CONFLICT => {
                    self.created_objects
                        .crops
                        .push(self.get(&format!("/api/crops/{id}")).await?);
                }
                status => {
                    let error_text = response.text().await.unwrap_or_default();
                    return Err(anyhow!("HTTP {status} /api/crops: {error_text}"));
                }
            }
            pb.inc(1);
        }

        pb.finish_with_message("Crops ready!");
        println!(
            "{} {} crops available",
            style("✅").green(),
            self.created_objects.crops.len()
        );
        Ok(())
    }

    pub async fn create_fields(&mut self, count: usize) -> anyhow::Result<()> {
        println!("{} Creating fields...", style("[2/3]").bold().dim());

        let requests = (0..count)
            .map(|i| ("/api/fields".to_string(), random_field(i, &self.created_objects.crops)))
            .collect();

        let pb = progress_bar(count)?;
        self.created_objects.fields = self.post_parallel(requests, &pb).await?;
        pb.finish_with_message("Fields created!");

        println!(
            "{} Created {} fields",
            style("✅").green(),
            self.created_objects.fields.len()
        );
        Ok(())
    }

    pub async fn create_operations(&mut self, per_field: usize) -> anyhow::Result<()> {
        println!("{} Recording operations...", style("[3/3]").bold().dim());

        let mut requests = Vec::new();
        for field in &self.created_objects.fields {
            let Some(field_id) = field["id"].as_str() else {
                continue;
            };
            let mut date = Local::now().date_naive() - ChronoDuration::days(200);
            for (operation, detail, rate) in OPERATIONS.iter().take(per_field) {
                date += ChronoDuration::days(rand::rng().random_range(7..35));
                requests.push((
                    format!("/api/fields/{field_id}/operations"),
                    json!({
                        "date": date.format("%Y-%m-%d").to_string(),
                        "operation": operation,
                        "detail": detail,
                        "rate": rate
                    }),
                ));
            }
        }

        let pb = progress_bar(requests.len())?;
        self.created_objects.operations = self.post_parallel(requests, &pb).await?;
        pb.finish_with_message("Operations recorded!");

        println!(
            "{} Recorded {} operations",
            style("✅").green(),
            self.created_objects.operations.len()
        );
        Ok(())
    }

    pub async fn seed_farm(&mut self, fields: usize, operations_per_field: usize) -> anyhow::Result<()> {
        println!();
        println!("{}", style("Farm Database Seeder").bold().blue());
        println!("{}", style("Creating crops, fields and a season of operations...").dim());
        println!();

        self.test_connection().await?;
        self.create_crops().await?;
        self.create_fields(fields).await?;
        self.create_operations(operations_per_field).await?;

        self.display_summary().await;
        Ok(())
    }

    async fn display_summary(&self) {
        println!();
        println!("{}", style("🎉 Database Seeding Complete!").bold().green());
        println!("{}", style("═".repeat(50)).dim());

        let summary_data = [
            ("Crops", self.created_objects.crops.len()),
            ("Fields", self.created_objects.fields.len()),
            ("Operations", self.created_objects.operations.len()),
        ];
        for (name, count) in summary_data {
            println!("{:.<20} {}", style(name).cyan(), style(count).bold().green());
        }

        match self.get("/api/dashboard").await {
            Ok(dashboard) => {
                println!();
                println!(
                    "Main crop: {}  Total area: {}  Estimated value: {}",
                    style(dashboard["main_crop"].as_str().unwrap_or("-")).bold(),
                    style(dashboard["total_area"].as_f64().unwrap_or(0.0)).bold(),
                    style(dashboard["total_value"].as_f64().unwrap_or(0.0).round()).bold()
                );
            }
            Err(e) => println!("{} Dashboard unavailable: {e}", style("⚠️").yellow()),
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = Command::new("Farm Database Seeder")
        .version("1.0")
        .about("Seeds the farm API with crops, fields and operations")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .value_name("URL")
                .help("API base URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new("fields")
                .short('f')
                .long("fields")
                .value_name("COUNT")
                .help("Number of fields to create")
                .value_parser(value_parser!(usize))
                .default_value("12"),
        )
        .arg(
            Arg::new("operations")
                .short('o')
                .long("operations")
                .value_name("COUNT")
                .help("Operations recorded per field")
                .value_parser(value_parser!(usize))
                .default_value("4"),
        )
        .arg(
            Arg::new("concurrency")
                .short('c')
                .long("concurrency")
                .value_name("N")
                .help("Maximum requests in flight")
                .value_parser(value_parser!(usize))
                .default_value("4"),
        )
        .get_matches();

    let base_url = matches
        .get_one::<String>("url")
        .context("Missing API URL")?;
    let fields = matches.get_one::<usize>("fields").copied().unwrap_or(12);
    let operations = matches.get_one::<usize>("operations").copied().unwrap_or(4);
    let concurrency = matches.get_one::<usize>("concurrency").copied().unwrap_or(4);

    println!("{}", style("Farm Database Seeder v1.0").bold());
    println!("{}", style("━".repeat(40)).dim());
    println!("API URL: {}", style(base_url).cyan());

    let mut seeder = FarmSeeder::new(base_url, concurrency)?;
    seeder.seed_farm(fields, operations).await?;

    Ok(())
}
