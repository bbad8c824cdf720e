//! Catalog listing commands: materials, cities, films

use super::CommandEnv;
use crate::output::OutputWriter;
use crate::output_types::{CitiesOutput, FilmsOutput, MaterialRow};
use anyhow::Result;
use uvalue_core::assets::description_image_url;
use uvalue_core::models::MaterialCatalog;
use uvalue_core::ports::EnvelopeService;

pub async fn materials(env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let client = env.client()?;
    let entries = client.materials().await.map_err(|e| env.explain(e))?;
    let catalog = MaterialCatalog::from_entries(entries);
    let backend_base = env.config.backend_base();

    let rows: Vec<MaterialRow> = catalog
        .sorted_names()
        .into_iter()
        .filter_map(|name| catalog.get(name))
        .map(|entry| MaterialRow {
            name: entry.name.clone(),
            conductivity: entry.conductivity,
            density: entry.density,
            description_image: entry
                .description_image()
                .and_then(|file| description_image_url(&backend_base, file)),
        })
        .collect();

    if !output.is_json() {
        output.section(format!("Materials ({})", rows.len()));
    }
    output.table(rows);
    Ok(())
}

pub async fn cities(env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let client = env.client()?;
    let cities = client.cities().await.map_err(|e| env.explain(e))?;

    if output.is_json() {
        output.result(CitiesOutput { cities })?;
    } else if cities.is_empty() {
        output.info("The backend lists no cities");
    } else {
        output.section(format!("Cities ({})", cities.len()));
        for city in &cities {
            println!("  {}", city);
        }
    }
    Ok(())
}

pub async fn films(env: &CommandEnv, output: &OutputWriter) -> Result<()> {
    let client = env.client()?;
    let mut controller = env.controller();

    if controller.films_query().is_none() {
        output.warning("No city selected; set one with: uvalue draft set-city <CITY>");
    }
    let films = controller.refresh_films(&client).await;
    let design = controller.design();

    if output.is_json() {
        output.result(FilmsOutput {
            city: design.city.clone(),
            assembly: design.assembly.as_str().to_string(),
            films,
            known: films.is_known(),
        })?;
    } else {
        output.section(format!("Surface films: {} / {}", design.city, design.assembly.label()));
        output.kv("Hi (inside)", format!("{} W/m²·K", films.hi));
        output.kv("Ho (outside)", format!("{} W/m²·K", films.ho));
        if !films.is_known() {
            output.info("Coefficients unavailable; the calculation does not depend on them");
        }
    }
    Ok(())
}
