use serde::Deserialize;

use super::repo::PropertyFields;

/// Listing form, field names as the original admin forms post them.
#[derive(Debug, Deserialize)]
pub struct PropertyForm {
    pub titulo: String,
    pub descripcion: String,
    pub precio: f64,
    #[serde(default)]
    pub habitaciones: i32,
    #[serde(default)]
    pub estacionamiento: i32,
    #[serde(default)]
    pub wc: i32,
    #[serde(default)]
    pub calle: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl PropertyForm {
    /// Collects every violated rule, matching the auth validation style.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.titulo.trim().is_empty() {
            errors.push("El Titulo del Anuncio es Obligatorio".into());
        }
        if self.descripcion.trim().is_empty() {
            errors.push("La Descripcion no puede ir vacia".into());
        }
        if self.precio <= 0.0 {
            errors.push("El Precio debe ser mayor a cero".into());
        }
        if self.lat.is_none() || self.lng.is_none() {
            errors.push("Ubica la Propiedad en el Mapa".into());
        }
        errors
    }

    pub fn into_fields(self) -> PropertyFields {
        PropertyFields {
            title: self.titulo.trim().to_string(),
            description: self.descripcion.trim().to_string(),
            price: self.precio,
            rooms: self.habitaciones,
            parking: self.estacionamiento,
            bathrooms: self.wc,
            street: self.calle.trim().to_string(),
            lat: self.lat.unwrap_or_default(),
            lng: self.lng.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> PropertyForm {
        PropertyForm {
            titulo: "Casa en la playa".into(),
            descripcion: "Casa con alberca".into(),
            precio: 1_500_000.0,
            habitaciones: 3,
            estacionamiento: 2,
            wc: 2,
            calle: "Av. del Mar 42".into(),
            lat: Some(23.23),
            lng: Some(-106.42),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().validate().is_empty());
    }

    #[test]
    fn missing_pin_price_and_title_are_all_reported() {
        let form = PropertyForm {
            titulo: " ".into(),
            precio: 0.0,
            lat: None,
            lng: None,
            ..valid_form()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 3);
    }
}
