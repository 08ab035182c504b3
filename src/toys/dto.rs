use serde::{de, Deserialize, Deserializer, Serialize};

use super::{repo_types::ToyDraft, services::ToyFilter};

/// Query string of `GET /api/toy`.
#[derive(Debug, Default, Deserialize)]
pub struct ToyQuery {
    pub name: Option<String>,
    pub price: Option<String>,
    pub labels: Option<String>,
    #[serde(rename = "inStock")]
    pub in_stock: Option<String>,
}

impl From<ToyQuery> for ToyFilter {
    fn from(q: ToyQuery) -> Self {
        Self {
            txt: q.name.filter(|s| !s.is_empty()),
            max_price: q
                .price
                .as_deref()
                .and_then(|p| p.trim().parse::<f64>().ok())
                .filter(|p| !p.is_nan()),
            labels: q
                .labels
                .map(|l| {
                    l.split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            in_stock: q.in_stock.and_then(|s| s.parse::<bool>().ok()),
        }
    }
}

/// Body of `POST /api/toy`.
#[derive(Debug, Deserialize)]
pub struct CreateToyRequest {
    pub name: String,
    #[serde(deserialize_with = "de_price")]
    pub price: f64,
    #[serde(rename = "inStock", default)]
    pub in_stock: bool,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl From<CreateToyRequest> for ToyDraft {
    fn from(r: CreateToyRequest) -> Self {
        Self {
            id: None,
            name: r.name,
            price: r.price,
            in_stock: r.in_stock,
            labels: r.labels,
        }
    }
}

/// Body of `PUT /api/toy`. Owner and createdAt sent by the client are ignored.
#[derive(Debug, Deserialize)]
pub struct UpdateToyRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "de_price")]
    pub price: f64,
    #[serde(rename = "inStock", default)]
    pub in_stock: bool,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl From<UpdateToyRequest> for ToyDraft {
    fn from(r: UpdateToyRequest) -> Self {
        Self {
            id: Some(r.id),
            name: r.name,
            price: r.price,
            in_stock: r.in_stock,
            labels: r.labels,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RemovedToyResponse {
    pub msg: String,
    #[serde(rename = "toyId")]
    pub toy_id: String,
}

/// Accepts `12.5` as well as `"12.5"`, the way HTML forms post numbers.
fn de_price<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    match NumOrStr::deserialize(d)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| de::Error::custom(format!("invalid price: {s:?}"))),
    }
}
