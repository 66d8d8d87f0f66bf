use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Nim).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::PhoneNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::EnrollmentYear).integer().not_null())
                    .col(ColumnDef::new(Users::GraduationYear).integer().not_null())
                    .col(ColumnDef::new(Users::RoleId).uuid().not_null())
                    .col(ColumnDef::new(Users::ProvinceId).uuid().not_null())
                    .col(ColumnDef::new(Users::CityId).uuid().not_null())
                    .col(ColumnDef::new(Users::FacultyId).uuid().not_null())
                    .col(ColumnDef::new(Users::MajorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Users::VerificationFileUrl)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::RefreshToken).string().null())
                    .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_role")
                            .from(Users::Table, Users::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_province")
                            .from(Users::Table, Users::ProvinceId)
                            .to(Provinces::Table, Provinces::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_city")
                            .from(Users::Table, Users::CityId)
                            .to(Cities::Table, Cities::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_faculty")
                            .from(Users::Table, Users::FacultyId)
                            .to(Faculties::Table, Faculties::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_major")
                            .from(Users::Table, Users::MajorId)
                            .to(Majors::Table, Majors::Id),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Nim,
    Name,
    Email,
    PasswordHash,
    PhoneNumber,
    EnrollmentYear,
    GraduationYear,
    RoleId,
    ProvinceId,
    CityId,
    FacultyId,
    MajorId,
    VerificationFileUrl,
    RefreshToken,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
}

#[derive(Iden)]
enum Provinces {
    Table,
    Id,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
}

#[derive(Iden)]
enum Faculties {
    Table,
    Id,
}

#[derive(Iden)]
enum Majors {
    Table,
    Id,
}
