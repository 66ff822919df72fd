//! Servers command - show the configured WFS servers.

use geoprox::config::ConfigFile;

/// Run the servers command.
pub fn run(config: &ConfigFile) {
    for server in &config.servers {
        let marker = if server.id == config.search.default_server {
            " (default)"
        } else {
            ""
        };
        println!("{}{}", server.id, marker);
        println!("  {}", server.label);
        println!("  URL:     {}", server.url);
        println!("  Dialect: {}", server.dialect);
        if let Some(format) = &server.output_format {
            println!("  Format:  {}", format);
        }
        for layer in &server.layers {
            println!("  Layer:   {}", layer);
        }
        println!();
    }
}
