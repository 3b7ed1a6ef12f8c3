//! Catalog models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    catalog::{hex::HexCode, records::Record},
    ids::TypedId,
    pricing::multiplier::Multiplier,
    segments::{Segment, UserSegment},
    validation::{ValidationError, require_text},
};

/// User id.
pub type UserId = TypedId<User>;

/// Category id.
pub type CategoryId = TypedId<Category>;

/// Color id.
pub type ColorId = TypedId<Color>;

/// Product id.
pub type ProductId = TypedId<Product>;

/// Pricing table id.
pub type PricingTableId = TypedId<PricingTable>;

/// Promotion id.
pub type PromotionId = TypedId<Promotion>;

/// Announcement id.
pub type AnnouncementId = TypedId<Announcement>;

/// Color ids offered for a product.
pub type ColorIds = SmallVec<[ColorId; 4]>;

const fn active_by_default() -> bool {
    true
}

/// Trim a required text field, rejecting blanks.
fn required(field: &'static str, value: String) -> Result<String, ValidationError> {
    require_text(field, &value)?;

    Ok(value.trim().to_string())
}

/// Blank optional text is stored as `None`.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

fn non_negative(price: Decimal) -> Result<Decimal, ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ValidationError::NegativePrice(price));
    }

    Ok(price)
}

/// Drop repeated color ids, keeping first-seen order.
fn distinct(colors: ColorIds) -> ColorIds {
    let mut seen = ColorIds::new();

    for color in colors {
        if !seen.contains(&color) {
            seen.push(color);
        }
    }

    seen
}

/// Someone who can sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Id.
    pub id: UserId,

    /// Login name, unique.
    pub username: String,

    /// Login secret. Never written out.
    #[serde(default, skip_serializing)]
    pub password: String,

    /// Role and buying segment.
    #[serde(rename = "userType")]
    pub segment: UserSegment,

    /// Display name.
    pub name: String,

    /// Whether the user may sign in.
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// Create request for a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewUser {
    /// Login name.
    pub username: String,
    /// Login secret.
    pub password: String,
    /// Role.
    pub segment: UserSegment,
    /// Display name.
    pub name: String,
}

/// Partial update for a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserUpdate {
    /// New login secret.
    pub password: Option<String>,
    /// New role.
    pub segment: Option<UserSegment>,
    /// New display name.
    pub name: Option<String>,
    /// Re-enable or disable sign-in.
    pub active: Option<bool>,
}

impl Record for User {
    type New = NewUser;
    type Update = UserUpdate;

    const ENTITY: &'static str = "user";

    fn id(&self) -> TypedId<Self> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn build(id: TypedId<Self>, new: NewUser) -> Result<Self, ValidationError> {
        require_text("password", &new.password)?;

        Ok(Self {
            id,
            username: required("username", new.username)?,
            password: new.password,
            segment: new.segment,
            name: required("name", new.name)?,
            active: true,
        })
    }

    fn apply(&mut self, update: UserUpdate) -> Result<(), ValidationError> {
        if let Some(password) = &update.password {
            require_text("password", password)?;
        }

        let name = update.name.map(|name| required("name", name)).transpose()?;

        if let Some(password) = update.password {
            self.password = password;
        }

        if let Some(name) = name {
            self.name = name;
        }

        if let Some(segment) = update.segment {
            self.segment = segment;
        }

        if let Some(active) = update.active {
            self.active = active;
        }

        Ok(())
    }
}

/// Product grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Id.
    pub id: CategoryId,

    /// Name.
    pub name: String,

    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the category is listed.
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// Create request for a [`Category`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCategory {
    /// Name.
    pub name: String,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update for a [`Category`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CategoryUpdate {
    /// New name.
    pub name: Option<String>,
    /// New blurb; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Re-list or withdraw.
    pub active: Option<bool>,
}

impl Record for Category {
    type New = NewCategory;
    type Update = CategoryUpdate;

    const ENTITY: &'static str = "category";

    fn id(&self) -> TypedId<Self> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn build(id: TypedId<Self>, new: NewCategory) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required("name", new.name)?,
            description: optional(new.description),
            active: true,
        })
    }

    fn apply(&mut self, update: CategoryUpdate) -> Result<(), ValidationError> {
        if let Some(name) = update.name {
            self.name = required("name", name)?;
        }

        if let Some(description) = update.description {
            self.description = optional(description);
        }

        if let Some(active) = update.active {
            self.active = active;
        }

        Ok(())
    }
}

/// A finish a product can be ordered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Color {
    /// Id.
    pub id: ColorId,

    /// Name shown to buyers.
    pub name: String,

    /// Swatch color.
    pub hex_code: HexCode,

    /// Whether the color is listed.
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// Create request for a [`Color`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewColor {
    /// Name.
    pub name: String,
    /// `#RGB` or `#RRGGBB`.
    pub hex_code: String,
}

/// Partial update for a [`Color`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColorUpdate {
    /// New name.
    pub name: Option<String>,
    /// New swatch.
    pub hex_code: Option<String>,
    /// Re-list or withdraw.
    pub active: Option<bool>,
}

impl Record for Color {
    type New = NewColor;
    type Update = ColorUpdate;

    const ENTITY: &'static str = "color";

    fn id(&self) -> TypedId<Self> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn build(id: TypedId<Self>, new: NewColor) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required("name", new.name)?,
            hex_code: new.hex_code.parse()?,
            active: true,
        })
    }

    fn apply(&mut self, update: ColorUpdate) -> Result<(), ValidationError> {
        let name = update.name.map(|name| required("name", name)).transpose()?;
        let hex_code = update
            .hex_code
            .map(|code| code.parse::<HexCode>())
            .transpose()?;

        if let Some(name) = name {
            self.name = name;
        }

        if let Some(hex_code) = hex_code {
            self.hex_code = hex_code;
        }

        if let Some(active) = update.active {
            self.active = active;
        }

        Ok(())
    }
}

/// Something a buyer can order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Id.
    pub id: ProductId,

    /// Name.
    pub name: String,

    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,

    /// Grouping, if any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Price before any pricing table applies.
    pub base_price: Decimal,

    /// Image references; the first is used for cart thumbnails.
    #[serde(default)]
    pub images: Vec<String>,

    /// Colors the product can be ordered in. Empty means the product has no color choice.
    #[serde(default)]
    pub available_colors: ColorIds,

    /// Whether the product is listed.
    #[serde(default = "active_by_default")]
    pub active: bool,
}

impl Product {
    /// Whether a color must be chosen to order this product.
    #[must_use]
    pub fn requires_color(&self) -> bool {
        !self.available_colors.is_empty()
    }

    /// Whether `color` is offered for this product.
    #[must_use]
    pub fn offers_color(&self, color: ColorId) -> bool {
        self.available_colors.contains(&color)
    }

    /// Image used in cart line items.
    #[must_use]
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Create request for a [`Product`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewProduct {
    /// Name.
    pub name: String,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
    /// Grouping.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Base price, not negative.
    pub base_price: Decimal,
    /// Image references.
    #[serde(default)]
    pub images: Vec<String>,
    /// Offered colors.
    #[serde(default)]
    pub available_colors: ColorIds,
}

/// Partial update for a [`Product`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductUpdate {
    /// New name.
    pub name: Option<String>,
    /// New blurb; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New grouping; `Some(None)` clears it.
    pub category_id: Option<Option<CategoryId>>,
    /// New base price.
    pub base_price: Option<Decimal>,
    /// Replacement image list.
    pub images: Option<Vec<String>>,
    /// Replacement color list.
    pub available_colors: Option<ColorIds>,
    /// Re-list or withdraw.
    pub active: Option<bool>,
}

impl Record for Product {
    type New = NewProduct;
    type Update = ProductUpdate;

    const ENTITY: &'static str = "product";

    fn id(&self) -> TypedId<Self> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn build(id: TypedId<Self>, new: NewProduct) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required("name", new.name)?,
            description: optional(new.description),
            category_id: new.category_id,
            base_price: non_negative(new.base_price)?,
            images: new.images,
            available_colors: distinct(new.available_colors),
            active: true,
        })
    }

    fn apply(&mut self, update: ProductUpdate) -> Result<(), ValidationError> {
        let name = update.name.map(|name| required("name", name)).transpose()?;
        let base_price = update.base_price.map(non_negative).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }

        if let Some(base_price) = base_price {
            self.base_price = base_price;
        }

        if let Some(description) = update.description {
            self.description = optional(description);
        }

        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }

        if let Some(images) = update.images {
            self.images = images;
        }

        if let Some(colors) = update.available_colors {
            self.available_colors = distinct(colors);
        }

        if let Some(active) = update.active {
            self.active = active;
        }

        Ok(())
    }
}

/// A segment-specific price multiplier, such as a payment term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTable {
    /// Id.
    pub id: PricingTableId,

    /// Name shown to buyers (e.g. `30/60 dias`).
    pub name: String,

    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,

    /// Factor applied to base prices.
    pub multiplier: Multiplier,

    /// Segment the table is offered to.
    #[serde(rename = "userType")]
    pub segment: Segment,

    /// Whether the table is offered.
    #[serde(default = "active_by_default")]
    pub active: bool,
}

/// Create request for a [`PricingTable`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPricingTable {
    /// Name.
    pub name: String,
    /// Optional blurb.
    #[serde(default)]
    pub description: Option<String>,
    /// Factor.
    pub multiplier: Multiplier,
    /// Segment.
    pub segment: Segment,
}

/// Partial update for a [`PricingTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PricingTableUpdate {
    /// New name.
    pub name: Option<String>,
    /// New blurb; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// New factor.
    pub multiplier: Option<Multiplier>,
    /// New segment.
    pub segment: Option<Segment>,
    /// Offer or withdraw.
    pub active: Option<bool>,
}

impl Record for PricingTable {
    type New = NewPricingTable;
    type Update = PricingTableUpdate;

    const ENTITY: &'static str = "pricing table";

    fn id(&self) -> TypedId<Self> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn build(id: TypedId<Self>, new: NewPricingTable) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            name: required("name", new.name)?,
            description: optional(new.description),
            multiplier: new.multiplier,
            segment: new.segment,
            active: true,
        })
    }

    fn apply(&mut self, update: PricingTableUpdate) -> Result<(), ValidationError> {
        if let Some(name) = update.name {
            self.name = required("name", name)?;
        }

        if let Some(description) = update.description {
            self.description = optional(description);
        }

        if let Some(multiplier) = update.multiplier {
            self.multiplier = multiplier;
        }

        if let Some(segment) = update.segment {
            self.segment = segment;
        }

        if let Some(active) = update.active {
            self.active = active;
        }

        Ok(())
    }
}

/// A promotional banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Id.
    pub id: PromotionId,

    /// Headline.
    pub title: String,

    /// Optional body.
    #[serde(default)]
    pub description: Option<String>,

    /// Whether the promotion is shown.
    #[serde(default = "active_by_default")]
    pub active: bool,

    /// When the promotion was created.
    pub created_at: Timestamp,
}

/// Create request for a [`Promotion`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPromotion {
    /// Headline.
    pub title: String,
    /// Optional body.
    #[serde(default)]
    pub description: Option<String>,
    /// Creation time.
    #[serde(default = "Timestamp::now")]
    pub created_at: Timestamp,
}

impl NewPromotion {
    /// A promotion created now.
    pub fn new(title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            title: title.into(),
            description,
            created_at: Timestamp::now(),
        }
    }
}

/// Partial update for a [`Promotion`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PromotionUpdate {
    /// New headline.
    pub title: Option<String>,
    /// New body; `Some(None)` clears it.
    pub description: Option<Option<String>>,
    /// Show or hide.
    pub active: Option<bool>,
}

impl Record for Promotion {
    type New = NewPromotion;
    type Update = PromotionUpdate;

    const ENTITY: &'static str = "promotion";

    fn id(&self) -> TypedId<Self> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn build(id: TypedId<Self>, new: NewPromotion) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            title: required("title", new.title)?,
            description: optional(new.description),
            active: true,
            created_at: new.created_at,
        })
    }

    fn apply(&mut self, update: PromotionUpdate) -> Result<(), ValidationError> {
        if let Some(title) = update.title {
            self.title = required("title", title)?;
        }

        if let Some(description) = update.description {
            self.description = optional(description);
        }

        if let Some(active) = update.active {
            self.active = active;
        }

        Ok(())
    }
}

/// A notice for one segment, or for everyone when `segment` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    /// Id.
    pub id: AnnouncementId,

    /// Headline.
    pub title: String,

    /// Body.
    pub message: String,

    /// Audience; `None` is a broadcast.
    #[serde(default, rename = "userType")]
    pub segment: Option<Segment>,

    /// Whether the announcement is shown.
    #[serde(default = "active_by_default")]
    pub active: bool,

    /// When the announcement was created.
    pub created_at: Timestamp,
}

impl Announcement {
    /// Whether buyers in `segment` should see this announcement.
    #[must_use]
    pub fn reaches(&self, segment: Segment) -> bool {
        self.segment.is_none_or(|target| target == segment)
    }
}

/// Create request for an [`Announcement`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewAnnouncement {
    /// Headline.
    pub title: String,
    /// Body.
    pub message: String,
    /// Audience.
    #[serde(default)]
    pub segment: Option<Segment>,
    /// Creation time.
    #[serde(default = "Timestamp::now")]
    pub created_at: Timestamp,
}

impl NewAnnouncement {
    /// An announcement created now.
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        segment: Option<Segment>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            segment,
            created_at: Timestamp::now(),
        }
    }
}

/// Partial update for an [`Announcement`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnnouncementUpdate {
    /// New headline.
    pub title: Option<String>,
    /// New body.
    pub message: Option<String>,
    /// New audience; `Some(None)` makes it a broadcast.
    pub segment: Option<Option<Segment>>,
    /// Show or hide.
    pub active: Option<bool>,
}

impl Record for Announcement {
    type New = NewAnnouncement;
    type Update = AnnouncementUpdate;

    const ENTITY: &'static str = "announcement";

    fn id(&self) -> TypedId<Self> {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn build(id: TypedId<Self>, new: NewAnnouncement) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            title: required("title", new.title)?,
            message: required("message", new.message)?,
            segment: new.segment,
            active: true,
            created_at: new.created_at,
        })
    }

    fn apply(&mut self, update: AnnouncementUpdate) -> Result<(), ValidationError> {
        let title = update.title.map(|title| required("title", title)).transpose()?;
        let message = update
            .message
            .map(|message| required("message", message))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }

        if let Some(message) = message {
            self.message = message;
        }

        if let Some(segment) = update.segment {
            self.segment = segment;
        }

        if let Some(active) = update.active {
            self.active = active;
        }

        Ok(())
    }
}
