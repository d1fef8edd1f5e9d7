use colored::Colorize;

use crate::bootstrap::AppBootstrap;

pub async fn run(app: &AppBootstrap) {
    let selected = app.selected_model().await;
    let catalog = app.services.orchestrator.catalog();

    for tag in catalog.tags() {
        let header = if tag == selected.chain_tag {
            format!("{tag} (selected)").bold().to_string()
        } else {
            tag.bold().to_string()
        };
        println!("{header}");
        for model in catalog.chain(tag) {
            let marker = if model.model_id == selected.model_id { "*" } else { " " };
            println!(
                "  {} {:<28} {} {}",
                marker.green(),
                model.model_id,
                model.label(),
                format!("[{}]", model.provider).bright_black()
            );
        }
    }
}
