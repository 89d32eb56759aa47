use hamlet_core::{HamletError, Result};
use serde_json::json;

use super::Project;

/// Prints the resources declared in the routing file.
pub fn list(project: &Project, json: bool) -> Result<()> {
    let generator = project.generator()?;
    let routes = generator.list_routes()?;
    let routes_file = &generator.config().routes.file;

    if json {
        let output = json!({
            "routes_file": routes_file.display().to_string(),
            "resources": routes,
        });
        let rendered = serde_json::to_string_pretty(&output)
            .map_err(|e| HamletError::configuration(format!("could not encode routes: {}", e)))?;
        println!("{}", rendered);
        return Ok(());
    }

    if routes.is_empty() {
        println!("No resources declared in {}", routes_file.display());
        return Ok(());
    }

    println!("Resources in {}:", routes_file.display());
    for route in routes {
        println!("  map.resources :{}", route);
    }
    Ok(())
}
