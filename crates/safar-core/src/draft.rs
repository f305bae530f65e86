//! # Draft Bookings
//!
//! An in-progress, not-yet-persisted booking intent. A draft exists only
//! after the booking validator has passed the form, so holding a
//! `PropertyDraft` or `ExperienceDraft` is proof of a valid booking.
//!
//! ## Construction & Mutation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Draft Lifecycle                                     │
//! │                                                                         │
//! │  StayForm/VisitForm ──► validate ──► Err(FieldErrors)  (UI re-renders)  │
//! │                            │                                            │
//! │                            ▼                                            │
//! │                     Ok(Draft)  fields private, pricing embedded         │
//! │                            │                                            │
//! │        update_contact / update_stay / update_visit                      │
//! │        (the ONLY mutation routes; each one re-validates and,            │
//! │         for date/guest changes, re-prices)                              │
//! │                            │                                            │
//! │                            ▼                                            │
//! │              BookingCheckout persists it exactly once                   │
//! │                                                                         │
//! │  Rates are snapshotted INTO the draft at creation (SnapshotAtAdd        │
//! │  policy): a catalog price change after draft time does not move the     │
//! │  quoted total.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::guests::GuestComposition;
use crate::pricing::{price, PriceBreakdown, PricingInput};
use crate::types::{ContactDetails, Experience, OrderKind, Property};
use crate::validation::{
    validate_contact, validate_stay, validate_visit, FieldErrors, StayForm, VisitForm,
};

// =============================================================================
// Property Draft
// =============================================================================

/// A validated, priced property stay awaiting checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDraft {
    /// Property snapshot taken at draft time; re-validation and re-pricing
    /// use this, not live catalog state.
    property: Property,
    contact: ContactDetails,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests: GuestComposition,
    special_requests: Option<String>,
    pricing: PriceBreakdown,
}

impl PropertyDraft {
    /// The only way to obtain a draft: a form that survives the validator.
    pub fn new(form: StayForm, property: &Property, today: NaiveDate) -> Result<Self, FieldErrors> {
        let errors = validate_stay(&form, property, today);
        if let (true, Some(check_in), Some(check_out)) =
            (errors.is_empty(), form.check_in, form.check_out)
        {
            let pricing = price(&PricingInput::PropertyStay {
                rate_per_night: property.rate_per_night,
                check_in,
                check_out,
            });
            return Ok(PropertyDraft {
                property: property.clone(),
                contact: trimmed(&form.contact),
                check_in,
                check_out,
                guests: form.guests,
                special_requests: form.special_requests,
                pricing,
            });
        }
        Err(errors)
    }

    /// Replaces contact details, re-validating them.
    pub fn update_contact(&mut self, contact: ContactDetails) -> Result<(), FieldErrors> {
        let errors = validate_contact(&contact);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.contact = trimmed(&contact);
        Ok(())
    }

    /// Replaces the stay dates and guests, re-validating and re-pricing.
    pub fn update_stay(
        &mut self,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guests: GuestComposition,
        today: NaiveDate,
    ) -> Result<(), FieldErrors> {
        let form = StayForm {
            contact: self.contact.clone(),
            check_in: Some(check_in),
            check_out: Some(check_out),
            guests,
            special_requests: self.special_requests.clone(),
        };
        let errors = validate_stay(&form, &self.property, today);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.check_in = check_in;
        self.check_out = check_out;
        self.guests = guests;
        self.pricing = price(&PricingInput::PropertyStay {
            rate_per_night: self.property.rate_per_night,
            check_in,
            check_out,
        });
        Ok(())
    }

    pub fn property_id(&self) -> &str {
        &self.property.id
    }

    pub fn property_name(&self) -> &str {
        &self.property.name
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    pub fn guests(&self) -> GuestComposition {
        self.guests
    }

    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    pub fn pricing(&self) -> PriceBreakdown {
        self.pricing
    }
}

// =============================================================================
// Experience Draft
// =============================================================================

/// A validated, priced experience visit awaiting checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceDraft {
    experience: Experience,
    contact: ContactDetails,
    visit_date: NaiveDate,
    time_slot: String,
    guests: GuestComposition,
    special_requests: Option<String>,
    pricing: PriceBreakdown,
}

impl ExperienceDraft {
    pub fn new(
        form: VisitForm,
        experience: &Experience,
        today: NaiveDate,
    ) -> Result<Self, FieldErrors> {
        let errors = validate_visit(&form, experience, today);
        if let (true, Some(visit_date), Some(time_slot)) =
            (errors.is_empty(), form.visit_date, form.time_slot.clone())
        {
            let pricing = price(&PricingInput::ExperienceVisit {
                rate_per_person: experience.rate_per_person,
                guests: form.guests,
            });
            return Ok(ExperienceDraft {
                experience: experience.clone(),
                contact: trimmed(&form.contact),
                visit_date,
                time_slot: time_slot.trim().to_string(),
                guests: form.guests,
                special_requests: form.special_requests,
                pricing,
            });
        }
        Err(errors)
    }

    /// Replaces contact details, re-validating them.
    pub fn update_contact(&mut self, contact: ContactDetails) -> Result<(), FieldErrors> {
        let errors = validate_contact(&contact);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.contact = trimmed(&contact);
        Ok(())
    }

    /// Replaces the visit details, re-validating and re-pricing.
    pub fn update_visit(
        &mut self,
        visit_date: NaiveDate,
        time_slot: String,
        guests: GuestComposition,
        today: NaiveDate,
    ) -> Result<(), FieldErrors> {
        let form = VisitForm {
            contact: self.contact.clone(),
            visit_date: Some(visit_date),
            time_slot: Some(time_slot.clone()),
            guests,
            special_requests: self.special_requests.clone(),
        };
        let errors = validate_visit(&form, &self.experience, today);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.visit_date = visit_date;
        self.time_slot = time_slot.trim().to_string();
        self.guests = guests;
        self.pricing = price(&PricingInput::ExperienceVisit {
            rate_per_person: self.experience.rate_per_person,
            guests,
        });
        Ok(())
    }

    pub fn experience_id(&self) -> &str {
        &self.experience.id
    }

    pub fn experience_name(&self) -> &str {
        &self.experience.name
    }

    pub fn contact(&self) -> &ContactDetails {
        &self.contact
    }

    pub fn visit_date(&self) -> NaiveDate {
        self.visit_date
    }

    pub fn time_slot(&self) -> &str {
        &self.time_slot
    }

    pub fn guests(&self) -> GuestComposition {
        self.guests
    }

    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    pub fn pricing(&self) -> PriceBreakdown {
        self.pricing
    }
}

// =============================================================================
// Booking Draft (tagged union)
// =============================================================================

/// Either kind of draft, matched exhaustively by the booking checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingDraft {
    Property(PropertyDraft),
    Experience(ExperienceDraft),
}

impl BookingDraft {
    pub fn kind(&self) -> OrderKind {
        match self {
            BookingDraft::Property(_) => OrderKind::Property,
            BookingDraft::Experience(_) => OrderKind::Experience,
        }
    }

    pub fn contact(&self) -> &ContactDetails {
        match self {
            BookingDraft::Property(d) => d.contact(),
            BookingDraft::Experience(d) => d.contact(),
        }
    }

    pub fn pricing(&self) -> PriceBreakdown {
        match self {
            BookingDraft::Property(d) => d.pricing(),
            BookingDraft::Experience(d) => d.pricing(),
        }
    }
}

fn trimmed(contact: &ContactDetails) -> ContactDetails {
    ContactDetails {
        full_name: contact.full_name.trim().to_string(),
        phone: contact.phone.trim().to_string(),
        email: contact.email.trim().to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
