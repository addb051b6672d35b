use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Members are owned by the identity collaborator; this schema only carries
        // what the custody core references (role for authorization, point for rewards).
        manager
            .create_table(
                Table::create()
                    .table(Members::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Members::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Members::Name).string().not_null())
                    .col(
                        ColumnDef::new(Members::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Members::Role)
                            .string_len(16)
                            .not_null()
                            .default("USER"),
                    )
                    .col(
                        ColumnDef::new(Members::Point)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Members::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Places::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Places::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Places::Address).string().not_null())
                    .col(ColumnDef::new(Places::DetailAddress).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Items::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Items::Name).string().not_null())
                    .col(ColumnDef::new(Items::CategoryId).big_integer().not_null())
                    .col(ColumnDef::new(Items::PlaceId).big_integer().not_null())
                    .col(ColumnDef::new(Items::Description).text().not_null())
                    .col(ColumnDef::new(Items::FoundDate).big_integer().not_null())
                    .col(ColumnDef::new(Items::FinderId).big_integer().null())
                    .col(ColumnDef::new(Items::ImageUrl).string().null())
                    .col(ColumnDef::new(Items::LockerNumber).integer().not_null())
                    .col(ColumnDef::new(Items::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Items::LockedUntil).big_integer().null())
                    .col(
                        ColumnDef::new(Items::IsRetrieved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Items::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Items::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_category_id")
                            .from(Items::Table, Items::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_place_id")
                            .from(Items::Table, Items::PlaceId)
                            .to(Places::Table, Places::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_items_finder_id")
                            .from(Items::Table, Items::FinderId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_items_status")
                    .table(Items::Table)
                    .col(Items::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ClaimRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClaimRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClaimRequests::ItemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClaimRequests::RequesterId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClaimRequests::ProofDescription)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClaimRequests::ProofDetailAddress)
                            .string()
                            .null(),
                    )
                    .col(ColumnDef::new(ClaimRequests::ProofImageUrl).string().null())
                    .col(
                        ColumnDef::new(ClaimRequests::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClaimRequests::RequestedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClaimRequests::DecidedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_claim_requests_item_id")
                            .from(ClaimRequests::Table, ClaimRequests::ItemId)
                            .to(Items::Table, Items::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_claim_requests_requester_id")
                            .from(ClaimRequests::Table, ClaimRequests::RequesterId)
                            .to(Members::Table, Members::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_claim_requests_item_status")
                    .table(ClaimRequests::Table)
                    .col(ClaimRequests::ItemId)
                    .col(ClaimRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_claim_requests_requester")
                    .table(ClaimRequests::Table)
                    .col(ClaimRequests::RequesterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClaimRequests::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Places::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Members::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Members {
    Table,
    Id,
    Name,
    Email,
    Role,
    Point,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
enum Places {
    Table,
    Id,
    Address,
    DetailAddress,
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Name,
    CategoryId,
    PlaceId,
    Description,
    FoundDate,
    FinderId,
    ImageUrl,
    LockerNumber,
    Status,
    LockedUntil,
    IsRetrieved,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClaimRequests {
    Table,
    Id,
    ItemId,
    RequesterId,
    ProofDescription,
    ProofDetailAddress,
    ProofImageUrl,
    Status,
    RequestedAt,
    DecidedAt,
}
