/// delivery destination owned by a user, read-only for order placement
#[derive(Debug, Clone, PartialEq)]
pub struct UserAddressModel {
    pub id: u64,
    pub usr_id: u32,
    pub recipient: String,
    pub phone: String,
    pub street: String,
    pub detail: String,
    pub subdistrict: String,
    pub district: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

impl UserAddressModel {
    pub fn destination(&self) -> String {
        let contact = if self.phone.is_empty() {
            self.recipient.clone()
        } else {
            format!("{} ({})", self.recipient, self.phone)
        };
        let prov_postal = join_nonempty(&[&self.province, &self.postal_code], " ");
        let region = join_nonempty(&[&self.city, &prov_postal], ", ");
        let parts = [
            &contact,
            &self.street,
            &self.detail,
            &self.subdistrict,
            &self.district,
            &region,
        ];
        join_nonempty(&parts, ", ")
    }
}

fn join_nonempty(parts: &[&String], sep: &str) -> String {
    parts
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}
