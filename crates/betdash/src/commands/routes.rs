//! `betdash routes`: the dashboard's route table.

use serde::Serialize;
use tabled::Tabled;

use betdash_core::{RouteTable, ViewId, ViewSpec};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct RouteInfo {
    path: &'static str,
    name: &'static str,
    view: ViewId,
    title: &'static str,
    data_endpoint: Option<&'static str>,
}

#[derive(Tabled)]
struct RouteRow {
    #[tabled(rename = "Path")]
    path: &'static str,
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Title")]
    title: &'static str,
    #[tabled(rename = "Data")]
    data: &'static str,
}

fn route_infos(table: RouteTable) -> Vec<RouteInfo> {
    table
        .routes()
        .iter()
        .map(|route| {
            let spec = ViewSpec::for_view(route.view);
            RouteInfo {
                path: route.path,
                name: route.name,
                view: route.view,
                title: spec.title,
                data_endpoint: spec.data_endpoint,
            }
        })
        .collect()
}

pub fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let routes = route_infos(RouteTable::dashboard());
    let out = output::render_list(
        &global.output,
        &routes,
        |r| RouteRow {
            path: r.path,
            name: r.name,
            title: r.title,
            data: r.data_endpoint.unwrap_or("(local)"),
        },
        |r| r.path.to_owned(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
