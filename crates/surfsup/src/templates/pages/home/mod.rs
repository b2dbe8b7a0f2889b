use maud::{html, Markup};

use crate::{
    templates::layouts::{base, PageConfig},
    DatasetRange,
};

const LIST_ROUTES: &[&str] = &[
    "/api/v1.0/precipitation",
    "/api/v1.0/stations",
    "/api/v1.0/tobs",
];

pub fn home_page(range: Option<&DatasetRange>) -> Markup {
    let config = PageConfig {
        title: "Surf's Up: Honolulu Climate API",
    };

    base(&config, content(range))
}

fn content(range: Option<&DatasetRange>) -> Markup {
    html! {
        p { "This site shows Honolulu weather stats." }

        p { "Available Routes:" }
        ul {
            @for route in LIST_ROUTES {
                li { a href=(route) { (route) } }
            }
        }

        @match range {
            Some(range) => {
                p {
                    "This dataset covers data between the dates of "
                    (range.first) " and " (range.last)
                }
            },
            None => {
                p { "This dataset does not contain any observations yet." }
            },
        }

        p { "To access min, max, and avg temperatures for all data following any specific date:" }
        p { code { "/api/v1.0/YYYY-MM-DD" } }
        p { "To access min, max, and avg temperatures between two dates:" }
        p { code { "/api/v1.0/YYYY-MM-DD/YYYY-MM-DD" } " (start date/end date)" }

        p { a href="/docs" { "API Docs" } }
    }
}
