//! # Booking Validator
//!
//! Cross-field rule engine for contact info, date ranges and guest/capacity
//! constraints.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Two-Gate Design                                    │
//! │                                                                         │
//! │  UI gathers input                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Gate 1: THIS MODULE                                                    │
//! │  ├── Runs EVERY check (no short-circuit)                               │
//! │  ├── Returns a field → error map, never raises                         │
//! │  └── Empty map is the SOLE authorization to advance checkout           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Gate 2: Pricing calculator                                             │
//! │  └── Prices invalid input to zero rather than erroring; it trusts      │
//! │      this gate to have blocked submission first                        │
//! │                                                                         │
//! │  All checks run independently so the UI can show every offending       │
//! │  field at once instead of one error per submit.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::guests::GuestComposition;
use crate::types::{ContactDetails, Experience, PaymentMethod, Property, ShippingAddress};

// =============================================================================
// Field Errors
// =============================================================================

/// One field's validation failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    /// The form field key, camelCase as the UI names it.
    pub field: String,
    pub error: ValidationError,
}

/// The field-keyed error map returned by every validator.
///
/// Empty means valid. Insertion order is preserved so the UI can focus the
/// first offending field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors {
    entries: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records an error against a field.
    pub fn push(&mut self, field: impl Into<String>, error: ValidationError) {
        self.entries.push(FieldError {
            field: field.into(),
            error,
        });
    }

    /// Shorthand for the most common failure: a required field is empty.
    fn require(&mut self, field: &str) {
        self.push(
            field,
            ValidationError::Required {
                field: field.to_string(),
            },
        );
    }

    /// The sole authorization signal: no entries means the caller may
    /// advance the checkout state machine.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// First error recorded against `field`, if any.
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.entries.iter().find(|e| e.field == field).map(|e| &e.error)
    }

    /// Display message for `field`, if it has an error.
    pub fn message(&self, field: &str) -> Option<String> {
        self.get(field).map(|e| e.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.entries.iter()
    }

    /// Appends all of `other`'s entries.
    pub fn merge(&mut self, other: FieldErrors) {
        self.entries.extend(other.entries);
    }
}

// =============================================================================
// Form Inputs
// =============================================================================

/// The retail checkout address step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingForm {
    pub contact: ContactDetails,
    pub address_line: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl ShippingForm {
    /// Trimmed snapshot frozen onto the order record.
    pub fn to_address(&self) -> ShippingAddress {
        ShippingAddress {
            address_line: self.address_line.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            pincode: self.pincode.trim().to_string(),
        }
    }
}

/// The property booking form (separate page, before checkout).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayForm {
    pub contact: ContactDetails,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests: GuestComposition,
    pub special_requests: Option<String>,
}

/// The experience booking form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitForm {
    pub contact: ContactDetails,
    pub visit_date: Option<NaiveDate>,
    pub time_slot: Option<String>,
    pub guests: GuestComposition,
    pub special_requests: Option<String>,
}

// =============================================================================
// Field Predicates
// =============================================================================

/// 10 digits, first digit 6-9 (regional mobile numbering rule).
pub fn is_valid_phone(phone: &str) -> bool {
    let phone = phone.trim();
    phone.len() == 10
        && phone.chars().all(|c| c.is_ascii_digit())
        && matches!(phone.chars().next(), Some('6'..='9'))
}

/// `local@domain.tld` shape. Not RFC 5321; the same pragmatic check the
/// storefront applies client-side.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.splitn(2, '@');
    let (local, domain) = match (parts.next(), parts.next()) {
        (Some(l), Some(d)) => (l, d),
        _ => return false,
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    // domain must be dotted with a non-empty tld
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Exactly 6 digits.
pub fn is_valid_pincode(pincode: &str) -> bool {
    let pincode = pincode.trim();
    pincode.len() == 6 && pincode.chars().all(|c| c.is_ascii_digit())
}

// =============================================================================
// Validators
// =============================================================================

/// Contact checks shared by every order kind.
fn check_contact(errors: &mut FieldErrors, contact: &ContactDetails) {
    if contact.full_name.trim().is_empty() {
        errors.require("fullName");
    }

    if contact.phone.trim().is_empty() {
        errors.require("phone");
    } else if !is_valid_phone(&contact.phone) {
        errors.push(
            "phone",
            ValidationError::InvalidFormat {
                field: "phone".to_string(),
                reason: "must be a 10-digit mobile number starting with 6-9".to_string(),
            },
        );
    }

    if contact.email.trim().is_empty() {
        errors.require("email");
    } else if !is_valid_email(&contact.email) {
        errors.push(
            "email",
            ValidationError::InvalidFormat {
                field: "email".to_string(),
                reason: "must look like name@example.com".to_string(),
            },
        );
    }
}

/// Guest/capacity checks shared by both booking kinds.
///
/// `limit` is the resource's capacity ceiling (max guests or max
/// participants); the error names it exactly.
fn check_guests(errors: &mut FieldErrors, guests: &GuestComposition, limit: u32) {
    let billable = guests.billable_total();
    if billable < 1 {
        errors.push("guests", ValidationError::NoBillableGuests);
    } else if billable > limit {
        errors.push("guests", ValidationError::CapacityExceeded { limit });
    }
}

/// Validates contact details alone (used by draft update paths).
pub fn validate_contact(contact: &ContactDetails) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_contact(&mut errors, contact);
    errors
}

/// Validates the retail checkout address step.
pub fn validate_shipping(form: &ShippingForm) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_contact(&mut errors, &form.contact);

    if form.address_line.trim().is_empty() {
        errors.require("addressLine");
    }
    if form.city.trim().is_empty() {
        errors.require("city");
    }
    if form.state.trim().is_empty() {
        errors.require("state");
    }

    if form.pincode.trim().is_empty() {
        errors.require("pincode");
    } else if !is_valid_pincode(&form.pincode) {
        errors.push(
            "pincode",
            ValidationError::InvalidFormat {
                field: "pincode".to_string(),
                reason: "must be exactly 6 digits".to_string(),
            },
        );
    }

    errors
}

/// Validates a property stay form against the property's constraints.
///
/// `today` is an input, not a clock read — the core stays pure and the
/// tests stay deterministic.
pub fn validate_stay(form: &StayForm, property: &Property, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_contact(&mut errors, &form.contact);

    if !property.is_available {
        errors.push(
            "property",
            ValidationError::Unavailable {
                resource: property.name.clone(),
            },
        );
    }

    match form.check_in {
        None => errors.require("checkIn"),
        Some(check_in) if check_in < today => {
            errors.push(
                "checkIn",
                ValidationError::DateInPast {
                    field: "checkIn".to_string(),
                },
            );
        }
        Some(_) => {}
    }

    match (form.check_in, form.check_out) {
        (_, None) => errors.require("checkOut"),
        (Some(check_in), Some(check_out)) if check_out <= check_in => {
            errors.push("checkOut", ValidationError::CheckOutNotAfterCheckIn);
        }
        _ => {}
    }

    check_guests(&mut errors, &form.guests, property.max_guests);

    errors
}

/// Validates an experience visit form against the experience's constraints.
pub fn validate_visit(form: &VisitForm, experience: &Experience, today: NaiveDate) -> FieldErrors {
    let mut errors = FieldErrors::new();
    check_contact(&mut errors, &form.contact);

    if !experience.is_available {
        errors.push(
            "experience",
            ValidationError::Unavailable {
                resource: experience.name.clone(),
            },
        );
    }

    match form.visit_date {
        None => errors.require("visitDate"),
        Some(date) if date < today => {
            errors.push(
                "visitDate",
                ValidationError::DateInPast {
                    field: "visitDate".to_string(),
                },
            );
        }
        Some(_) => {}
    }

    match form.time_slot.as_deref().map(str::trim) {
        None | Some("") => errors.require("timeSlot"),
        Some(slot) if !experience.time_slots.iter().any(|s| s == slot) => {
            errors.push(
                "timeSlot",
                ValidationError::NotAllowed {
                    field: "timeSlot".to_string(),
                    allowed: experience.time_slots.clone(),
                },
            );
        }
        Some(_) => {}
    }

    check_guests(&mut errors, &form.guests, experience.max_participants);

    errors
}

/// Validates the payment-method step (checkout step 2).
///
/// Non-cash methods require a non-empty transaction reference; cash settles
/// in person.
pub fn validate_payment(method: PaymentMethod, transaction_id: Option<&str>) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if method.requires_reference() {
        match transaction_id.map(str::trim) {
            None | Some("") => errors.require("transactionId"),
            Some(_) => {}
        }
    }

    errors
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn good_contact() -> ContactDetails {
        ContactDetails {
            full_name: "Asha Devi".to_string(),
            phone: "9876543210".to_string(),
            email: "asha@example.com".to_string(),
        }
    }

    fn test_property(max_guests: u32) -> Property {
        Property {
            id: "prop-1".to_string(),
            name: "Pine View Homestay".to_string(),
            location: "Bir".to_string(),
            rate_per_night: Money::from_rupees(1000),
            max_guests,
            is_available: true,
        }
    }

    fn test_experience(max_participants: u32) -> Experience {
        Experience {
            id: "exp-1".to_string(),
            name: "Sunrise Trek".to_string(),
            location: "Triund".to_string(),
            rate_per_person: Money::from_rupees(1000),
            max_participants,
            is_available: true,
            time_slots: vec!["06:00 AM".to_string(), "09:00 AM".to_string()],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn good_stay_form() -> StayForm {
        StayForm {
            contact: good_contact(),
            check_in: Some(date(2025, 6, 10)),
            check_out: Some(date(2025, 6, 13)),
            guests: GuestComposition::new(),
            special_requests: None,
        }
    }

    const TODAY: fn() -> NaiveDate = || date(2025, 6, 1);

    #[test]
    fn test_phone_predicate() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("6000000000"));

        assert!(!is_valid_phone("12345")); // too short
        assert!(!is_valid_phone("1234567890")); // starts with 1
        assert!(!is_valid_phone("98765432101")); // too long
        assert!(!is_valid_phone("98765x3210")); // non-digit
    }

    #[test]
    fn test_email_predicate() {
        assert!(is_valid_email("asha@example.com"));
        assert!(is_valid_email("a.b+c@mail.example.in"));

        assert!(!is_valid_email("ashaexample.com")); // no @
        assert!(!is_valid_email("@example.com")); // empty local
        assert!(!is_valid_email("asha@example")); // no tld
        assert!(!is_valid_email("asha@.com")); // empty host
        assert!(!is_valid_email("asha @example.com")); // whitespace
    }

    #[test]
    fn test_pincode_predicate() {
        assert!(is_valid_pincode("176077"));
        assert!(!is_valid_pincode("1760")); // too short
        assert!(!is_valid_pincode("17607x")); // non-digit
        assert!(!is_valid_pincode("1760777")); // too long
    }

    #[test]
    fn test_bad_phone_gets_a_field_message() {
        // phone "12345" ⇒ error on phone with a non-empty message;
        // "9876543210" ⇒ no phone error
        let mut form = good_stay_form();
        form.contact.phone = "12345".to_string();

        let errors = validate_stay(&form, &test_property(4), TODAY());
        assert!(!errors.message("phone").unwrap().is_empty());

        form.contact.phone = "9876543210".to_string();
        let errors = validate_stay(&form, &test_property(4), TODAY());
        assert!(errors.get("phone").is_none());
    }

    #[test]
    fn test_all_checks_run_not_short_circuit() {
        let form = StayForm {
            contact: ContactDetails::default(),
            check_in: None,
            check_out: None,
            guests: GuestComposition {
                adults: 0,
                women: 0,
                children: 0,
                infants: 2,
            },
            special_requests: None,
        };
        let errors = validate_stay(&form, &test_property(4), TODAY());

        // Every offending field got its own entry in one pass
        assert!(errors.get("fullName").is_some());
        assert!(errors.get("phone").is_some());
        assert!(errors.get("email").is_some());
        assert!(errors.get("checkIn").is_some());
        assert!(errors.get("checkOut").is_some());
        assert!(errors.get("guests").is_some());
    }

    #[test]
    fn test_valid_stay_form_authorizes() {
        let errors = validate_stay(&good_stay_form(), &test_property(4), TODAY());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_check_in_before_today_rejected() {
        let mut form = good_stay_form();
        form.check_in = Some(date(2025, 5, 28));
        let errors = validate_stay(&form, &test_property(4), TODAY());
        assert_eq!(
            errors.get("checkIn"),
            Some(&ValidationError::DateInPast {
                field: "checkIn".to_string()
            })
        );

        // check-in exactly today is fine
        let mut form = good_stay_form();
        form.check_in = Some(TODAY());
        let errors = validate_stay(&form, &test_property(4), TODAY());
        assert!(errors.get("checkIn").is_none());
    }

    #[test]
    fn test_check_out_must_be_strictly_after_check_in() {
        let mut form = good_stay_form();
        form.check_out = form.check_in;
        let errors = validate_stay(&form, &test_property(4), TODAY());
        assert_eq!(
            errors.get("checkOut"),
            Some(&ValidationError::CheckOutNotAfterCheckIn)
        );
    }

    #[test]
    fn test_capacity_error_names_the_limit() {
        // max 10, requested 11 ⇒ CapacityExceeded naming "10"; 10 ⇒ ok
        let mut form = VisitForm {
            contact: good_contact(),
            visit_date: Some(date(2025, 6, 10)),
            time_slot: Some("06:00 AM".to_string()),
            guests: GuestComposition {
                adults: 5,
                women: 3,
                children: 3,
                infants: 0,
            },
            special_requests: None,
        };
        let experience = test_experience(10);

        let errors = validate_visit(&form, &experience, TODAY());
        let message = errors.message("guests").unwrap();
        assert!(message.contains("10"), "message was: {message}");

        form.guests.children = 2; // billable 10 == limit
        let errors = validate_visit(&form, &experience, TODAY());
        assert!(errors.get("guests").is_none());
    }

    #[test]
    fn test_infants_do_not_count_toward_capacity() {
        let form = VisitForm {
            contact: good_contact(),
            visit_date: Some(date(2025, 6, 10)),
            time_slot: Some("06:00 AM".to_string()),
            guests: GuestComposition {
                adults: 2,
                women: 0,
                children: 0,
                infants: 9,
            },
            special_requests: None,
        };
        let errors = validate_visit(&form, &test_experience(4), TODAY());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_time_slot_must_be_offered() {
        let form = VisitForm {
            contact: good_contact(),
            visit_date: Some(date(2025, 6, 10)),
            time_slot: Some("11:30 PM".to_string()),
            guests: GuestComposition::new(),
            special_requests: None,
        };
        let errors = validate_visit(&form, &test_experience(4), TODAY());
        assert!(matches!(
            errors.get("timeSlot"),
            Some(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_unavailable_resource_rejected() {
        let mut property = test_property(4);
        property.is_available = false;
        let errors = validate_stay(&good_stay_form(), &property, TODAY());
        assert!(matches!(
            errors.get("property"),
            Some(ValidationError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_shipping_form_requires_address_fields() {
        let form = ShippingForm {
            contact: good_contact(),
            ..ShippingForm::default()
        };
        let errors = validate_shipping(&form);

        assert!(errors.get("addressLine").is_some());
        assert!(errors.get("city").is_some());
        assert!(errors.get("state").is_some());
        assert!(errors.get("pincode").is_some());
    }

    #[test]
    fn test_shipping_pincode_format() {
        let mut form = ShippingForm {
            contact: good_contact(),
            address_line: "14 Mall Road".to_string(),
            city: "Dharamshala".to_string(),
            state: "Himachal Pradesh".to_string(),
            pincode: "1760".to_string(),
        };
        let errors = validate_shipping(&form);
        assert!(matches!(
            errors.get("pincode"),
            Some(ValidationError::InvalidFormat { .. })
        ));

        form.pincode = "176215".to_string();
        assert!(validate_shipping(&form).is_empty());
    }

    #[test]
    fn test_payment_reference_required_for_non_cash() {
        assert!(!validate_payment(PaymentMethod::Upi, None).is_empty());
        assert!(!validate_payment(PaymentMethod::Card, Some("  ")).is_empty());
        assert!(validate_payment(PaymentMethod::Upi, Some("UPI123456")).is_empty());
        // Cash settles on arrival/delivery, no reference needed
        assert!(validate_payment(PaymentMethod::Cash, None).is_empty());
    }
}
