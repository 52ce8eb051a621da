//! Active Directory computer account operations.

use std::collections::{HashMap, HashSet};

use actionpack_core::ResultMap;
use ldap3::{Mod, Scope, SearchEntry, ldap_escape};
use tracing::{debug, info, instrument};

use crate::connection::LdapConnection;
use crate::error::LdapActionError;

/// Output key holding the distinguished name of the computer's OU.
pub const RESULT_OU_DN: &str = "resultOUDN";

const SAM_ACCOUNT_NAME: &str = "sAMAccountName";
const UNICODE_PWD: &str = "unicodePwd";
const MAX_INITIAL_PASSWORD_LEN: usize = 14;

/// Find the organizational unit holding a computer account.
///
/// The return result is the first RDN of the OU (`OU=Servers`) and
/// `resultOUDN` the full OU distinguished name.
#[instrument(skip(connection), fields(host = %connection.host))]
pub async fn get_computer_account_ou(
    connection: &LdapConnection,
    root_dn: &str,
    computer_common_name: &str,
) -> Result<ResultMap, LdapActionError> {
    let mut ldap = connection.connect().await?;
    let filter = format!("(cn={})", ldap_escape(computer_common_name));
    let (entries, _) = ldap
        .with_timeout(connection.timeout)
        .search(root_dn, Scope::Subtree, &filter, vec!["ou"])
        .await?
        .success()?;
    let _ = ldap.unbind().await;

    let Some(entry) = entries.into_iter().next() else {
        debug!(%filter, "no matching entry");
        return Err(LdapActionError::NotFound);
    };
    let entry = SearchEntry::construct(entry);
    let ou_dn = ou_dn(&entry.dn, attribute(&entry.attrs, "ou"));
    info!(dn = %entry.dn, ou = %ou_dn, "found computer account");
    Ok(ResultMap::success(first_rdn(&ou_dn)).with(RESULT_OU_DN, ou_dn))
}

/// Reset a computer account password to its initial value.
#[instrument(skip(connection), fields(host = %connection.host))]
pub async fn reset_computer_account(
    connection: &LdapConnection,
    computer_dn: &str,
) -> Result<ResultMap, LdapActionError> {
    let mut ldap = connection.connect().await?;
    let (entries, _) = ldap
        .with_timeout(connection.timeout)
        .search(computer_dn, Scope::Base, "(objectClass=*)", vec![SAM_ACCOUNT_NAME])
        .await?
        .success()?;

    let entry = entries
        .into_iter()
        .next()
        .map(SearchEntry::construct)
        .ok_or(LdapActionError::NotFound)?;
    let account = attribute(&entry.attrs, SAM_ACCOUNT_NAME)
        .and_then(|values| values.first())
        .ok_or_else(|| LdapActionError::MissingAttribute {
            dn: computer_dn.to_owned(),
            attribute: SAM_ACCOUNT_NAME.to_owned(),
        })?;

    let password = initial_password(account);
    let modification = Mod::Replace(
        UNICODE_PWD.as_bytes().to_vec(),
        HashSet::from([unicode_pwd(&password)]),
    );
    ldap.with_timeout(connection.timeout)
        .modify(computer_dn, vec![modification])
        .await?
        .success()?;
    let _ = ldap.unbind().await;

    info!(dn = %computer_dn, "reset computer account");
    Ok(ResultMap::success(format!(
        "The computer account {computer_dn} was reset."
    )))
}

/// Values of an attribute, matching its name case-insensitively.
fn attribute<'a>(attrs: &'a HashMap<String, Vec<String>>, name: &str) -> Option<&'a Vec<String>> {
    attrs
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v)
}

/// OU distinguished name of an entry.
///
/// An `ou` value that is itself a DN wins; otherwise the parent of the entry
/// DN is used.
pub fn ou_dn(entry_dn: &str, ou_values: Option<&Vec<String>>) -> String {
    if let Some(value) = ou_values
        .and_then(|values| values.first())
        .filter(|v| v.contains(','))
    {
        return value.clone();
    }
    entry_dn
        .split_once(',')
        .map_or_else(|| entry_dn.to_owned(), |(_, parent)| parent.to_owned())
}

/// Text before the first `,` of a DN.
pub fn first_rdn(dn: &str) -> &str {
    dn.split_once(',').map_or(dn, |(first, _)| first)
}

/// Initial password of a computer account: the account name without its
/// trailing `$`, lower-cased and cut to 14 characters.
pub fn initial_password(sam_account_name: &str) -> String {
    sam_account_name
        .strip_suffix('$')
        .unwrap_or(sam_account_name)
        .to_lowercase()
        .chars()
        .take(MAX_INITIAL_PASSWORD_LEN)
        .collect()
}

/// `unicodePwd` value: the quoted password in UTF-16LE.
pub fn unicode_pwd(password: &str) -> Vec<u8> {
    format!("\"{password}\"")
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect()
}
