//! xAL postal address extraction

use super::tags;
use crate::document::TreeNode;
use crate::model::Address;

/// Path from `bldg:address` down to the xAL locality block
const LOCALITY_PATH: [&str; 5] = [
    tags::CORE_ADDRESS,
    tags::XAL_ADDRESS,
    tags::ADDRESS_DETAILS,
    tags::COUNTRY,
    tags::LOCALITY,
];

/// Read street, house number and postal code from a `bldg:address` node
///
/// Every node along the way is optional. Whatever is missing, including
/// blank text, is left as `None` in the result.
pub fn extract_address<N: TreeNode>(address: &N) -> Address {
    let locality = match address.find_path(&LOCALITY_PATH) {
        Ok(locality) => locality,
        Err(missing) => {
            tracing::debug!(%missing, "address has no locality block");
            return Address::default();
        }
    };

    let thoroughfare = locality.child(tags::THOROUGHFARE);
    Address {
        street: thoroughfare.and_then(|t| text_of(t, tags::THOROUGHFARE_NAME)),
        house_number: thoroughfare.and_then(|t| text_of(t, tags::THOROUGHFARE_NUMBER)),
        postal_code: locality
            .child(tags::POSTAL_CODE)
            .and_then(|p| text_of(p, tags::POSTAL_CODE_NUMBER)),
    }
}

fn text_of<N: TreeNode>(parent: &N, tag: &str) -> Option<String> {
    parent
        .child(tag)
        .map(|node| node.text().trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
